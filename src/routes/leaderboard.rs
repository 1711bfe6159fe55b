use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};

use crate::{
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse},
    error::AppError,
    routes::auth::{PlayerIdentity, require_player_token},
    services::leaderboard_service,
    state::SharedState,
};

/// Routes exposing the ranked top list.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/leaderboard", get(get_leaderboard))
        .route_layer(middleware::from_fn_with_state(state, require_player_token))
}

/// Return the top ten records plus the viewer's own rank.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by /enter-game"),
        ("sort_by" = Option<String>, Query, description = "Ordering column: `score` (default) or `best_streak`")
    ),
    responses(
        (status = 200, description = "Ranked top list with viewer standing", body = LeaderboardResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Extension(PlayerIdentity(identity)): Extension<PlayerIdentity>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let response =
        leaderboard_service::get_leaderboard(&state, query.sort_by, Some(identity)).await?;
    Ok(Json(response))
}
