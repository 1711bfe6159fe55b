use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{DateTime, doc},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{FIELD_BEST_STREAK, FIELD_CORRECT_STREAK, FIELD_CREATED_AT, FIELD_SCORE, MongoScoreDocument},
};
use crate::dao::{
    models::ScoreRecordEntity,
    score_store::{ScoreStore, SortKey},
    storage::StorageResult,
};

const SCORE_COLLECTION_NAME: &str = "scores";

#[derive(Clone)]
pub struct MongoScoreStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoScoreStore {
    /// Establish a connection to MongoDB and ensure the ranking indexes exist.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;

        for (name, field) in [
            ("score_rank_idx", FIELD_SCORE),
            ("streak_rank_idx", FIELD_BEST_STREAK),
        ] {
            let index = mongodb::IndexModel::builder()
                .keys(doc! { field: -1, FIELD_CREATED_AT: 1 })
                .options(IndexOptions::builder().name(Some(name.to_owned())).build())
                .build();

            collection
                .create_index(index)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection: SCORE_COLLECTION_NAME,
                    index: field,
                    source,
                })?;
        }

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoScoreDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoScoreDocument>(SCORE_COLLECTION_NAME)
    }

    /// One atomic round trip: score and streak are overwritten, the best
    /// streak is `$max`-merged, and the creation stamp is set only on insert.
    /// Concurrent submissions for one identity therefore cannot lose the
    /// monotonic best-streak invariant.
    async fn upsert(
        &self,
        identity: String,
        score: u32,
        correct_streak: u32,
        best_streak: u32,
    ) -> MongoResult<ScoreRecordEntity> {
        let collection = self.collection().await;
        let update = doc! {
            "$set": {
                FIELD_SCORE: i64::from(score),
                FIELD_CORRECT_STREAK: i64::from(correct_streak),
            },
            "$max": { FIELD_BEST_STREAK: i64::from(best_streak) },
            "$setOnInsert": { FIELD_CREATED_AT: DateTime::now() },
        };

        let document = collection
            .find_one_and_update(doc! { "_id": &identity }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::UpsertScore {
                identity: identity.clone(),
                source,
            })?
            .ok_or(MongoDaoError::MissingUpsertResult { identity })?;

        Ok(document.into())
    }

    async fn find(&self, identity: String) -> MongoResult<Option<ScoreRecordEntity>> {
        let collection = self.collection().await;
        let document = collection
            .find_one(doc! { "_id": &identity })
            .await
            .map_err(|source| MongoDaoError::LoadScore { identity, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_top(&self, key: SortKey, limit: usize) -> MongoResult<Vec<ScoreRecordEntity>> {
        let collection = self.collection().await;
        let documents: Vec<MongoScoreDocument> = collection
            .find(doc! {})
            .sort(doc! { sort_field(key): -1, FIELD_CREATED_AT: 1, "_id": 1 })
            .limit(limit as i64)
            .await
            .map_err(|source| MongoDaoError::ListScores { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListScores { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn count_above(&self, key: SortKey, value: u32) -> MongoResult<u64> {
        let collection = self.collection().await;
        collection
            .count_documents(doc! { sort_field(key): { "$gt": i64::from(value) } })
            .await
            .map_err(|source| MongoDaoError::CountScores { source })
    }
}

fn sort_field(key: SortKey) -> &'static str {
    match key {
        SortKey::Score => FIELD_SCORE,
        SortKey::BestStreak => FIELD_BEST_STREAK,
    }
}

impl ScoreStore for MongoScoreStore {
    fn upsert_score(
        &self,
        identity: String,
        score: u32,
        correct_streak: u32,
        best_streak: u32,
    ) -> BoxFuture<'static, StorageResult<ScoreRecordEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .upsert(identity, score, correct_streak, best_streak)
                .await
                .map_err(Into::into)
        })
    }

    fn find_score(
        &self,
        identity: String,
    ) -> BoxFuture<'static, StorageResult<Option<ScoreRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find(identity).await.map_err(Into::into) })
    }

    fn list_top(
        &self,
        key: SortKey,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<ScoreRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_top(key, limit).await.map_err(Into::into) })
    }

    fn count_strictly_above(
        &self,
        key: SortKey,
        value: u32,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.count_above(key, value).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
