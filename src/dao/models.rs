use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Authoritative per-player score record persisted by the storage layer.
///
/// `score` and `correct_streak` are overwritten by each submission;
/// `best_streak` only ever grows (the store max-merges it). `created_at` is
/// the stable tie-break key for leaderboard ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreRecordEntity {
    /// Unique player identity key.
    pub identity: String,
    /// Latest reported total score.
    pub score: u32,
    /// Latest reported consecutive-correct streak.
    pub correct_streak: u32,
    /// Longest streak ever reported; monotonic under merge.
    pub best_streak: u32,
    /// Timestamp of the first submission for this identity.
    pub created_at: SystemTime,
}

impl ScoreRecordEntity {
    /// Zero-valued record handed out for identities that never submitted.
    ///
    /// Callers cannot tell a brand-new player apart from one with a zero
    /// score, which is the intended contract.
    pub fn zeroed(identity: String) -> Self {
        Self {
            identity,
            score: 0,
            correct_streak: 0,
            best_streak: 0,
            created_at: SystemTime::UNIX_EPOCH,
        }
    }
}
