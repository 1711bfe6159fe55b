use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
    routing::post,
};

use crate::{
    dto::auth::{EnterGameRequest, EnterGameResponse},
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Verified player identity injected into protected request extensions.
#[derive(Clone)]
pub struct PlayerIdentity(pub String);

/// Routes handling player registration.
pub fn router() -> Router<SharedState> {
    Router::new().route("/enter-game", post(enter_game))
}

/// Register a display name and receive a bearer token for it.
#[utoipa::path(
    post,
    path = "/enter-game",
    tag = "auth",
    request_body = EnterGameRequest,
    responses(
        (status = 200, description = "Player registered", body = EnterGameResponse),
        (status = 400, description = "Invalid or already-taken name")
    )
)]
pub async fn enter_game(
    State(state): State<SharedState>,
    Json(payload): Json<EnterGameRequest>,
) -> Result<Json<EnterGameResponse>, AppError> {
    let response = auth_service::enter_game(&state, payload)?;
    Ok(Json(response))
}

/// Resolve the `Authorization: Bearer` header to a player identity, failing
/// the request with 401 before any handler state is touched.
pub async fn require_player_token(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|value| value.to_owned())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    let identity = auth_service::resolve_token(&state, &token)
        .ok_or_else(|| AppError::Unauthorized("invalid or expired token".into()))?;

    req.extensions_mut().insert(PlayerIdentity(identity));
    Ok(next.run(req).await)
}
