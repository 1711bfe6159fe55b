//! Event construction for the ranking-change broadcast.

use crate::{dto::sse::ServerEvent, state::SharedState};

/// Event name consumed by leaderboard viewers.
const EVENT_RANKINGS_CHANGED: &str = "rankings_changed";

/// Tell every connected viewer that rankings may have changed.
///
/// The event carries no payload on purpose: consumers re-query the
/// leaderboard instead of trusting pushed partial state, so a lost or
/// reordered notification can never leave them with stale embedded data.
pub fn broadcast_rankings_changed(state: &SharedState) {
    state.rankings_sse().broadcast(ServerEvent::new(
        Some(EVENT_RANKINGS_CHANGED.to_string()),
        String::new(),
    ));
}
