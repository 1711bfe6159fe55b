//! In-process score store used when no database is configured, and in tests.

use std::{cmp::Reverse, sync::Arc, time::SystemTime};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::{
    models::ScoreRecordEntity,
    score_store::{ScoreStore, SortKey},
    storage::StorageResult,
};

/// Score store backed by a concurrent map; no durability across restarts.
#[derive(Clone, Default)]
pub struct MemoryScoreStore {
    records: Arc<DashMap<String, ScoreRecordEntity>>,
}

impl MemoryScoreStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The upsert runs entirely inside the map entry guard, so submissions
    /// for the same identity serialize and the best-streak max-merge can
    /// never lose an update.
    fn upsert(
        &self,
        identity: String,
        score: u32,
        correct_streak: u32,
        best_streak: u32,
    ) -> ScoreRecordEntity {
        let entry = self
            .records
            .entry(identity.clone())
            .and_modify(|record| {
                record.score = score;
                record.correct_streak = correct_streak;
                record.best_streak = record.best_streak.max(best_streak);
            })
            .or_insert_with(|| ScoreRecordEntity {
                identity,
                score,
                correct_streak,
                best_streak,
                created_at: SystemTime::now(),
            });
        entry.value().clone()
    }

    fn sorted(&self, key: SortKey, limit: usize) -> Vec<ScoreRecordEntity> {
        let mut records: Vec<ScoreRecordEntity> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| {
            Reverse(key.value_of(a))
                .cmp(&Reverse(key.value_of(b)))
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.identity.cmp(&b.identity))
        });
        records.truncate(limit);
        records
    }

    fn count_above(&self, key: SortKey, value: u32) -> u64 {
        self.records
            .iter()
            .filter(|entry| key.value_of(entry.value()) > value)
            .count() as u64
    }
}

impl ScoreStore for MemoryScoreStore {
    fn upsert_score(
        &self,
        identity: String,
        score: u32,
        correct_streak: u32,
        best_streak: u32,
    ) -> BoxFuture<'static, StorageResult<ScoreRecordEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.upsert(identity, score, correct_streak, best_streak)) })
    }

    fn find_score(
        &self,
        identity: String,
    ) -> BoxFuture<'static, StorageResult<Option<ScoreRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.records.get(&identity).map(|entry| entry.value().clone())) })
    }

    fn list_top(
        &self,
        key: SortKey,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.sorted(key, limit)) })
    }

    fn count_strictly_above(
        &self,
        key: SortKey,
        value: u32,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.count_above(key, value)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &MemoryScoreStore, identity: &str, score: u32, best: u32) {
        store
            .upsert_score(identity.to_string(), score, 0, best)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn first_submission_creates_exactly_one_record() {
        let store = MemoryScoreStore::new();
        seed(&store, "ada", 100, 2).await;
        seed(&store, "ada", 150, 1).await;

        let listed = store.list_top(SortKey::Score, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].score, 150);
    }

    #[tokio::test]
    async fn best_streak_only_merges_upward() {
        let store = MemoryScoreStore::new();
        store
            .upsert_score("ada".into(), 100, 5, 5)
            .await
            .unwrap();
        let merged = store.upsert_score("ada".into(), 200, 3, 3).await.unwrap();

        assert_eq!(merged.score, 200);
        assert_eq!(merged.correct_streak, 3);
        assert_eq!(merged.best_streak, 5, "best streak must not regress");
    }

    #[tokio::test]
    async fn concurrent_submissions_keep_the_maximum_best_streak() {
        let store = MemoryScoreStore::new();
        let mut handles = Vec::new();
        for best in 1..=20u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert_score("ada".into(), best * 10, best, best)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.find_score("ada".into()).await.unwrap().unwrap();
        assert_eq!(record.best_streak, 20);
    }

    #[tokio::test]
    async fn ordering_is_stable_across_queries() {
        let store = MemoryScoreStore::new();
        seed(&store, "ada", 300, 1).await;
        seed(&store, "bob", 300, 4).await;
        seed(&store, "eve", 500, 2).await;

        let first = store.list_top(SortKey::Score, 10).await.unwrap();
        let second = store.list_top(SortKey::Score, 10).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].identity, "eve");

        let by_streak = store.list_top(SortKey::BestStreak, 10).await.unwrap();
        assert_eq!(by_streak[0].identity, "bob");
    }

    #[tokio::test]
    async fn count_above_matches_rank_semantics() {
        let store = MemoryScoreStore::new();
        seed(&store, "ada", 100, 0).await;
        seed(&store, "bob", 200, 0).await;
        seed(&store, "eve", 300, 0).await;

        assert_eq!(store.count_strictly_above(SortKey::Score, 150).await.unwrap(), 2);
        assert_eq!(store.count_strictly_above(SortKey::Score, 300).await.unwrap(), 0);
        assert_eq!(store.count_strictly_above(SortKey::Score, 0).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn missing_identity_is_none() {
        let store = MemoryScoreStore::new();
        assert!(store.find_score("ghost".into()).await.unwrap().is_none());
    }
}
