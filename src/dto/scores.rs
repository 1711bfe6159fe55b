use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::ScoreRecordEntity;

/// Totals reported by a client after a round resolves.
///
/// Field types already reject non-numeric and negative values at
/// deserialization time; no extra range rules apply.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct SubmitScoreRequest {
    /// New authoritative total; overwrites the stored value.
    pub score: u32,
    /// Current streak; overwrites the stored value.
    pub correct_streak: u32,
    /// Candidate best streak; max-merged with the stored value.
    pub best_streak: u32,
}

/// Authoritative totals for one player, as stored by the ledger.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct PlayerStateResponse {
    /// Player identity.
    pub username: String,
    /// Stored total score.
    pub score: u32,
    /// Stored current streak.
    pub correct_streak: u32,
    /// Stored best streak.
    pub best_streak: u32,
}

impl From<ScoreRecordEntity> for PlayerStateResponse {
    fn from(record: ScoreRecordEntity) -> Self {
        Self {
            username: record.identity,
            score: record.score,
            correct_streak: record.correct_streak,
            best_streak: record.best_streak,
        }
    }
}
