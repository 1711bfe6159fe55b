use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/rankings",
    responses((status = 200, description = "Ranking-change notification stream", content_type = "text/event-stream", body = String))
)]
/// Stream ranking-change notifications to connected leaderboard viewers.
pub async fn rankings_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_rankings(&state);
    info!("new ranking SSE connection");
    sse_service::broadcast_handshake(state.rankings_sse(), state.is_degraded().await);
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/rankings", get(rankings_stream))
}
