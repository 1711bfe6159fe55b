use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};

use crate::{
    dto::scores::{PlayerStateResponse, SubmitScoreRequest},
    error::AppError,
    routes::auth::{PlayerIdentity, require_player_token},
    services::score_service,
    state::SharedState,
};

/// Routes handling score submission and player state reads.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/scores", post(submit_score))
        .route("/player/me", get(get_player_state))
        .route_layer(middleware::from_fn_with_state(state, require_player_token))
}

/// Store the reported totals for the authenticated player.
#[utoipa::path(
    post,
    path = "/scores",
    tag = "scores",
    request_body = SubmitScoreRequest,
    params(("Authorization" = String, Header, description = "Bearer token issued by /enter-game")),
    responses(
        (status = 200, description = "Merged score record", body = PlayerStateResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn submit_score(
    State(state): State<SharedState>,
    Extension(PlayerIdentity(identity)): Extension<PlayerIdentity>,
    Json(payload): Json<SubmitScoreRequest>,
) -> Result<Json<PlayerStateResponse>, AppError> {
    let record = score_service::submit_score(&state, identity, payload).await?;
    Ok(Json(record))
}

/// Return the stored totals for the authenticated player.
#[utoipa::path(
    get,
    path = "/player/me",
    tag = "scores",
    params(("Authorization" = String, Header, description = "Bearer token issued by /enter-game")),
    responses(
        (status = 200, description = "Stored totals, zeroed for new players", body = PlayerStateResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_player_state(
    State(state): State<SharedState>,
    Extension(PlayerIdentity(identity)): Extension<PlayerIdentity>,
) -> Result<Json<PlayerStateResponse>, AppError> {
    let snapshot = score_service::get_player_state(&state, identity).await?;
    Ok(Json(snapshot))
}
