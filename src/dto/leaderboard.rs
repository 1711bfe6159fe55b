use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::{models::ScoreRecordEntity, score_store::SortKey};

/// Column the leaderboard should be ordered by.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Order by total score.
    #[default]
    Score,
    /// Order by longest streak.
    BestStreak,
}

impl From<SortBy> for SortKey {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Score => SortKey::Score,
            SortBy::BestStreak => SortKey::BestStreak,
        }
    }
}

/// Query parameters accepted by the leaderboard endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeaderboardQuery {
    /// Requested ordering; defaults to total score.
    #[serde(default)]
    pub sort_by: SortBy,
}

/// One row of the public top list.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Player identity.
    pub username: String,
    /// Stored total score.
    pub score: u32,
    /// Stored best streak.
    pub best_streak: u32,
}

impl From<ScoreRecordEntity> for LeaderboardEntry {
    fn from(record: ScoreRecordEntity) -> Self {
        Self {
            username: record.identity,
            score: record.score,
            best_streak: record.best_streak,
        }
    }
}

/// Top list plus the requesting viewer's own standing.
///
/// The viewer fields are computed independently of the top slice, so they are
/// correct even when the viewer does not appear in it.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct LeaderboardResponse {
    /// Up to ten records in rank order.
    pub leaderboard: Vec<LeaderboardEntry>,
    /// 1-based rank of the viewer among all records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_rank: Option<u64>,
    /// Viewer's stored total score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_score: Option<u32>,
    /// Viewer's stored best streak.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_best_streak: Option<u32>,
}
