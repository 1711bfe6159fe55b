use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Tile Quiz Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::rankings_stream,
        crate::routes::auth::enter_game,
        crate::routes::scores::submit_score,
        crate::routes::scores::get_player_state,
        crate::routes::leaderboard::get_leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::EnterGameRequest,
            crate::dto::auth::EnterGameResponse,
            crate::dto::scores::SubmitScoreRequest,
            crate::dto::scores::PlayerStateResponse,
            crate::dto::leaderboard::LeaderboardEntry,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::sse::Handshake,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Player registration and token issuance"),
        (name = "scores", description = "Score submission and player state"),
        (name = "leaderboard", description = "Ranked top list queries"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
