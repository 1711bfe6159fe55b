use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("required environment variable `{var}` is not set")]
    MissingEnvVar { var: &'static str },
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to upsert score record for `{identity}`")]
    UpsertScore {
        identity: String,
        #[source]
        source: MongoError,
    },
    #[error("upsert for `{identity}` returned no record")]
    MissingUpsertResult { identity: String },
    #[error("failed to load score record for `{identity}`")]
    LoadScore {
        identity: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to list score records")]
    ListScores {
        #[source]
        source: MongoError,
    },
    #[error("failed to count score records")]
    CountScores {
        #[source]
        source: MongoError,
    },
}
