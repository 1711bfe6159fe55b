//! Top-N selection and viewer rank computation.

use crate::{
    dao::{models::ScoreRecordEntity, score_store::SortKey},
    dto::leaderboard::{LeaderboardResponse, SortBy},
    error::ServiceError,
    state::SharedState,
};

/// Number of records exposed in the public top list.
const TOP_LIMIT: usize = 10;

/// Build the ranked top list, plus the viewer's standing when an identity is
/// supplied.
///
/// The viewer rank is `count of records strictly above the viewer's value,
/// plus one`, computed against the full record set; a viewer without a
/// record ranks as if they held the zero record.
pub async fn get_leaderboard(
    state: &SharedState,
    sort_by: SortBy,
    viewer: Option<String>,
) -> Result<LeaderboardResponse, ServiceError> {
    let store = state.require_score_store().await?;
    let key: SortKey = sort_by.into();

    let top = store.list_top(key, TOP_LIMIT).await?;
    let mut response = LeaderboardResponse {
        leaderboard: top.into_iter().map(Into::into).collect(),
        viewer_rank: None,
        viewer_score: None,
        viewer_best_streak: None,
    };

    if let Some(identity) = viewer {
        let record = store
            .find_score(identity.clone())
            .await?
            .unwrap_or_else(|| ScoreRecordEntity::zeroed(identity));
        let above = store.count_strictly_above(key, key.value_of(&record)).await?;

        response.viewer_rank = Some(above + 1);
        response.viewer_score = Some(record.score);
        response.viewer_best_streak = Some(record.best_streak);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::AppConfig,
        dao::score_store::{ScoreStore, memory::MemoryScoreStore},
        state::{AppState, SharedState},
    };

    use super::*;

    async fn state_with_players(count: u32) -> SharedState {
        let state = AppState::new(AppConfig::default());
        let store = MemoryScoreStore::new();
        for index in 1..=count {
            // player-1 scores lowest, player-<count> highest.
            store
                .upsert_score(format!("player-{index}"), index * 10, 0, index)
                .await
                .unwrap();
        }
        state.set_score_store(Arc::new(store)).await;
        state
    }

    #[tokio::test]
    async fn top_list_is_capped_at_ten_and_viewer_rank_is_global() {
        let state = state_with_players(12).await;

        // player-2 holds the second-lowest score: rank 11 of 12.
        let response = get_leaderboard(&state, SortBy::Score, Some("player-2".into()))
            .await
            .unwrap();

        assert_eq!(response.leaderboard.len(), 10);
        assert_eq!(response.leaderboard[0].username, "player-12");
        assert!(
            !response
                .leaderboard
                .iter()
                .any(|entry| entry.username == "player-2"),
            "rank-11 viewer stays outside the top ten"
        );
        assert_eq!(response.viewer_rank, Some(11));
        assert_eq!(response.viewer_score, Some(20));
    }

    #[tokio::test]
    async fn repeated_queries_return_identical_orderings() {
        let state = state_with_players(5).await;
        let first = get_leaderboard(&state, SortBy::Score, None).await.unwrap();
        let second = get_leaderboard(&state, SortBy::Score, None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn best_streak_ordering_uses_the_streak_column() {
        let state = state_with_players(3).await;
        let response = get_leaderboard(&state, SortBy::BestStreak, Some("player-1".into()))
            .await
            .unwrap();
        assert_eq!(response.leaderboard[0].username, "player-3");
        assert_eq!(response.viewer_rank, Some(3));
        assert_eq!(response.viewer_best_streak, Some(1));
    }

    #[tokio::test]
    async fn unseen_viewer_ranks_last() {
        let state = state_with_players(4).await;
        let response = get_leaderboard(&state, SortBy::Score, Some("ghost".into()))
            .await
            .unwrap();
        assert_eq!(response.viewer_rank, Some(5));
        assert_eq!(response.viewer_score, Some(0));
        assert_eq!(response.viewer_best_streak, Some(0));
    }

    #[tokio::test]
    async fn empty_board_is_tolerated() {
        let state = state_with_players(0).await;
        let response = get_leaderboard(&state, SortBy::Score, Some("ghost".into()))
            .await
            .unwrap();
        assert!(response.leaderboard.is_empty());
        assert_eq!(response.viewer_rank, Some(1));
    }

    #[tokio::test]
    async fn anonymous_query_omits_viewer_fields() {
        let state = state_with_players(2).await;
        let response = get_leaderboard(&state, SortBy::Score, None).await.unwrap();
        assert_eq!(response.viewer_rank, None);
        assert_eq!(response.viewer_score, None);
    }
}
