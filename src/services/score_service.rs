//! Ledger-facing operations: submit a score report, read a player's totals.

use tracing::info;

use crate::{
    dao::models::ScoreRecordEntity,
    dto::scores::{PlayerStateResponse, SubmitScoreRequest},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Persist a client-reported score for `identity` and notify leaderboard
/// viewers.
///
/// The store overwrites `score` and `correct_streak` and max-merges
/// `best_streak` in one atomic operation; the first submission for an
/// identity creates its record. The ranking-change broadcast is
/// fire-and-forget, so callers never wait on viewer delivery.
pub async fn submit_score(
    state: &SharedState,
    identity: String,
    request: SubmitScoreRequest,
) -> Result<PlayerStateResponse, ServiceError> {
    let store = state.require_score_store().await?;
    let record = store
        .upsert_score(
            identity,
            request.score,
            request.correct_streak,
            request.best_streak,
        )
        .await?;

    info!(
        identity = %record.identity,
        score = record.score,
        best_streak = record.best_streak,
        "score record updated"
    );
    sse_events::broadcast_rankings_changed(state);

    Ok(record.into())
}

/// Read the stored totals for `identity`.
///
/// Unknown identities get the zero record; this layer deliberately does not
/// distinguish a new player from one with a zero score.
pub async fn get_player_state(
    state: &SharedState,
    identity: String,
) -> Result<PlayerStateResponse, ServiceError> {
    let store = state.require_score_store().await?;
    let record = store
        .find_score(identity.clone())
        .await?
        .unwrap_or_else(|| ScoreRecordEntity::zeroed(identity));
    Ok(record.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::AppConfig,
        dao::score_store::memory::MemoryScoreStore,
        state::{AppState, SharedState},
    };

    use super::*;

    async fn state_with_store() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .set_score_store(Arc::new(MemoryScoreStore::new()))
            .await;
        state
    }

    fn report(score: u32, correct_streak: u32, best_streak: u32) -> SubmitScoreRequest {
        SubmitScoreRequest {
            score,
            correct_streak,
            best_streak,
        }
    }

    #[tokio::test]
    async fn submission_creates_then_updates_a_single_record() {
        let state = state_with_store().await;

        let created = submit_score(&state, "ada".into(), report(120, 1, 1))
            .await
            .unwrap();
        assert_eq!(created.score, 120);

        let updated = submit_score(&state, "ada".into(), report(80, 0, 1))
            .await
            .unwrap();
        assert_eq!(updated.score, 80);

        let listed = state
            .require_score_store()
            .await
            .unwrap()
            .list_top(crate::dao::score_store::SortKey::Score, 10)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn best_streak_survives_a_lower_report() {
        let state = state_with_store().await;

        submit_score(&state, "ada".into(), report(100, 5, 5))
            .await
            .unwrap();
        let merged = submit_score(&state, "ada".into(), report(200, 3, 3))
            .await
            .unwrap();

        assert_eq!(merged.score, 200);
        assert_eq!(merged.correct_streak, 3);
        assert_eq!(merged.best_streak, 5);
    }

    #[tokio::test]
    async fn submission_notifies_ranking_subscribers() {
        let state = state_with_store().await;
        let mut rx = state.rankings_sse().subscribe();

        submit_score(&state, "ada".into(), report(10, 1, 1))
            .await
            .unwrap();

        let event = rx.try_recv().expect("broadcast after successful upsert");
        assert_eq!(event.event.as_deref(), Some("rankings_changed"));
    }

    #[tokio::test]
    async fn unknown_player_reads_as_zero_record() {
        let state = state_with_store().await;
        let snapshot = get_player_state(&state, "ghost".into()).await.unwrap();
        assert_eq!(
            snapshot,
            PlayerStateResponse {
                username: "ghost".into(),
                score: 0,
                correct_streak: 0,
                best_streak: 0,
            }
        );
    }

    #[tokio::test]
    async fn degraded_mode_rejects_submissions() {
        let state = AppState::new(AppConfig::default());
        let err = submit_score(&state, "ada".into(), report(10, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
