//! Thin authentication boundary: display-name registration and opaque bearer
//! tokens.
//!
//! The core treats a verified identity as a trusted opaque key; everything in
//! here is the adapter that hands such keys out. Tokens live in process
//! memory only.

use dashmap::mapref::entry::Entry;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::auth::{EnterGameRequest, EnterGameResponse},
    error::ServiceError,
    state::SharedState,
};

/// Register a display name and mint a bearer token for it.
///
/// Names are unique case-insensitively; the claim happens inside the map
/// entry so two racing registrations cannot both win.
pub fn enter_game(
    state: &SharedState,
    request: EnterGameRequest,
) -> Result<EnterGameResponse, ServiceError> {
    request.validate()?;
    let username = request.username;

    match state.player_names().entry(username.to_lowercase()) {
        Entry::Occupied(_) => {
            return Err(ServiceError::InvalidInput(format!(
                "player name `{username}` is already taken"
            )));
        }
        Entry::Vacant(slot) => {
            slot.insert(username.clone());
        }
    }

    let token = Uuid::new_v4().simple().to_string();
    state.tokens().insert(token.clone(), username.clone());

    Ok(EnterGameResponse {
        message: "Welcome to the game!".into(),
        token,
        username,
    })
}

/// Resolve a bearer token to the player identity it was minted for.
pub fn resolve_token(state: &SharedState, token: &str) -> Option<String> {
    state.tokens().get(token).map(|entry| entry.value().clone())
}

/// Drop a token so it can no longer authenticate requests.
pub fn revoke_token(state: &SharedState, token: &str) {
    state.tokens().remove(token);
}

#[cfg(test)]
mod tests {
    use crate::{config::AppConfig, state::AppState};

    use super::*;

    fn request(username: &str) -> EnterGameRequest {
        EnterGameRequest {
            username: username.into(),
        }
    }

    #[test]
    fn registration_mints_a_resolvable_token() {
        let state = AppState::new(AppConfig::default());
        let response = enter_game(&state, request("ada")).unwrap();
        assert_eq!(response.username, "ada");
        assert_eq!(resolve_token(&state, &response.token).as_deref(), Some("ada"));
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let state = AppState::new(AppConfig::default());
        enter_game(&state, request("ada")).unwrap();
        let err = enter_game(&state, request("AdA")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn invalid_names_never_mutate_the_registry() {
        let state = AppState::new(AppConfig::default());
        assert!(enter_game(&state, request("ab")).is_err());
        assert!(state.player_names().is_empty());
        assert!(state.tokens().is_empty());
    }

    #[test]
    fn revoked_tokens_stop_resolving() {
        let state = AppState::new(AppConfig::default());
        let response = enter_game(&state, request("ada")).unwrap();
        revoke_token(&state, &response.token);
        assert_eq!(resolve_token(&state, &response.token), None);
    }

    #[test]
    fn unknown_tokens_resolve_to_nothing() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(resolve_token(&state, "deadbeef"), None);
    }
}
