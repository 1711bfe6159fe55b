//! Application-level configuration loading, including round budgets and scoring constants.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TILE_QUIZ_BACK_CONFIG_PATH";

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Budgets applied to every round.
    pub round: RoundConfig,
    /// Point constants consumed by the scoring engine.
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Per-round time, hint, and grid budgets.
pub struct RoundConfig {
    /// Countdown budget in seconds for a single round.
    pub round_seconds: u32,
    /// Number of random-reveal hints available per round.
    pub reveal_budget: u32,
    /// Number of tiles covering the picture.
    pub tile_count: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_seconds: 30,
            reveal_budget: 3,
            tile_count: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Point constants for round resolution.
///
/// The values are plain configuration; the scoring shape (streak multiplier,
/// time bands, zero floor) lives in [`crate::state::scoring`].
pub struct ScoringConfig {
    /// Points granted for a correct answer before multipliers.
    pub base_correct_points: u32,
    /// Streak multiplier growth per consecutive correct answer.
    pub streak_step: f64,
    /// Remaining seconds at or above which time bonus bands start counting.
    pub time_bonus_threshold_seconds: u32,
    /// Width in seconds of one time bonus band.
    pub time_band_seconds: u32,
    /// Bonus multiplier contributed by each full time band.
    pub time_band_step: f64,
    /// Points removed on a wrong answer.
    pub wrong_penalty: u32,
    /// Points removed when the countdown expires without an answer.
    pub timeout_penalty: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_correct_points: 100,
            streak_step: 0.1,
            time_bonus_threshold_seconds: 20,
            time_band_seconds: 5,
            time_band_step: 0.1,
            wrong_penalty: 100,
            timeout_penalty: 100,
        }
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration file");
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    round: RoundConfig,
    #[serde(default)]
    scoring: ScoringConfig,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            round: value.round,
            scoring: value.scoring,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_budgets() {
        let config = AppConfig::default();
        assert_eq!(config.round.round_seconds, 30);
        assert_eq!(config.round.reveal_budget, 3);
        assert_eq!(config.round.tile_count, 25);
        assert_eq!(config.scoring.base_correct_points, 100);
        assert_eq!(config.scoring.wrong_penalty, 100);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let raw: RawConfig = serde_json::from_str(r#"{"scoring": {"wrong_penalty": 50}}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.scoring.wrong_penalty, 50);
        assert_eq!(config.scoring.base_correct_points, 100);
        assert_eq!(config.round.round_seconds, 30);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let parsed = serde_json::from_str::<RawConfig>(r#"{"colors": []}"#);
        assert!(parsed.is_ok());
    }
}
