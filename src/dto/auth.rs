use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_player_name;

/// Payload used to join the game under a display name.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EnterGameRequest {
    /// Chosen display name, unique across players (case-insensitive).
    #[validate(custom(function = validate_player_name))]
    pub username: String,
}

/// Credential handed back once a player has joined.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnterGameResponse {
    /// Human-readable welcome message.
    pub message: String,
    /// Opaque bearer token to present on protected endpoints.
    pub token: String,
    /// Display name as registered.
    pub username: String,
}
