//! Validation helpers for DTOs.

use validator::ValidationError;

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 12;

/// Validates that a player display name is 3 to 12 non-blank characters.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("ada")        // Ok
/// validate_player_name("ab")         // Err - too short
/// validate_player_name("   ")        // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!(
                "Player name must be {NAME_MIN_CHARS} to {NAME_MAX_CHARS} characters (got {chars})"
            )
            .into(),
        );
        return Err(err);
    }

    if name.trim().is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must contain visible characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("ada").is_ok());
        assert!(validate_player_name("grace_hopper").is_ok());
        assert!(validate_player_name("abc123").is_ok());
    }

    #[test]
    fn test_validate_player_name_invalid_length() {
        assert!(validate_player_name("ab").is_err()); // too short
        assert!(validate_player_name("thirteenchars").is_err()); // too long
        assert!(validate_player_name("").is_err()); // empty
    }

    #[test]
    fn test_validate_player_name_blank() {
        assert!(validate_player_name("    ").is_err());
    }
}
