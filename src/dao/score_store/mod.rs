pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::models::ScoreRecordEntity;
use crate::dao::storage::StorageResult;

/// Column the leaderboard is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Total score.
    Score,
    /// Longest streak ever reported.
    BestStreak,
}

impl SortKey {
    /// Extract the sort value of `record` for this key.
    pub fn value_of(&self, record: &ScoreRecordEntity) -> u32 {
        match self {
            SortKey::Score => record.score,
            SortKey::BestStreak => record.best_streak,
        }
    }
}

/// Abstraction over the persistence layer for player score records.
///
/// `upsert_score` must be atomic per identity: overwrite `score` and
/// `correct_streak`, max-merge `best_streak`, create the record on first
/// sight. A plain read-then-write would lose best-streak updates under
/// concurrent submissions from multiple devices.
pub trait ScoreStore: Send + Sync {
    fn upsert_score(
        &self,
        identity: String,
        score: u32,
        correct_streak: u32,
        best_streak: u32,
    ) -> BoxFuture<'static, StorageResult<ScoreRecordEntity>>;
    fn find_score(
        &self,
        identity: String,
    ) -> BoxFuture<'static, StorageResult<Option<ScoreRecordEntity>>>;
    /// Records ordered descending by `key`; ties resolve by creation time
    /// then identity so repeated queries return identical orderings.
    fn list_top(
        &self,
        key: SortKey,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreRecordEntity>>>;
    /// Number of records whose `key` value is strictly greater than `value`.
    fn count_strictly_above(
        &self,
        key: SortKey,
        value: u32,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
