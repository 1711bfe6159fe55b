use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::dao::models::ScoreRecordEntity;

/// Field names shared between queries and the serialized document.
pub const FIELD_SCORE: &str = "score";
pub const FIELD_CORRECT_STREAK: &str = "correct_streak";
pub const FIELD_BEST_STREAK: &str = "best_streak";
pub const FIELD_CREATED_AT: &str = "created_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoScoreDocument {
    #[serde(rename = "_id")]
    identity: String,
    score: i64,
    correct_streak: i64,
    best_streak: i64,
    created_at: DateTime,
}

impl From<ScoreRecordEntity> for MongoScoreDocument {
    fn from(value: ScoreRecordEntity) -> Self {
        Self {
            identity: value.identity,
            score: i64::from(value.score),
            correct_streak: i64::from(value.correct_streak),
            best_streak: i64::from(value.best_streak),
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoScoreDocument> for ScoreRecordEntity {
    fn from(value: MongoScoreDocument) -> Self {
        Self {
            identity: value.identity,
            score: clamp_u32(value.score),
            correct_streak: clamp_u32(value.correct_streak),
            best_streak: clamp_u32(value.best_streak),
            created_at: value.created_at.to_system_time(),
        }
    }
}

/// BSON has no unsigned integers; anything outside `u32` came from a foreign
/// writer and is clamped rather than rejected.
fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
