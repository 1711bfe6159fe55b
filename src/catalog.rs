//! Quiz item catalog adapter.
//!
//! The catalog is an external collaborator: a JSON file listing pictures with
//! their answer choices. The core only consumes the `{path, choices,
//! correct_index}` triple; serving the image bytes is someone else's job.

use std::{env, fs, path::PathBuf};

use rand::seq::IndexedRandom;
use serde::Deserialize;
use thiserror::Error;

/// Default location on disk where the server looks for the catalog file.
const DEFAULT_CATALOG_PATH: &str = "config/catalog.json";
/// Environment variable that overrides [`DEFAULT_CATALOG_PATH`].
const CATALOG_PATH_ENV: &str = "TILE_QUIZ_CATALOG_PATH";

/// One guessable picture with its multiple-choice answers.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct QuizItem {
    /// Path or URL of the picture, opaque to the core.
    pub path: String,
    /// Ordered answer choices presented to the player.
    pub choices: Vec<String>,
    /// Index into `choices` of the right answer.
    pub correct_index: usize,
}

/// Errors raised while loading or validating the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file `{path}`")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalog file is not valid JSON.
    #[error("failed to parse catalog file `{path}`")]
    Parse {
        /// Path that was attempted.
        path: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// An item fails the structural checks.
    #[error("catalog item {index} is invalid: {reason}")]
    InvalidItem {
        /// Position of the offending item in the file.
        index: usize,
        /// Human-readable reason.
        reason: String,
    },
}

/// In-memory set of quiz items.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<QuizItem>,
}

impl Catalog {
    /// Load the catalog from disk, validating every item.
    pub fn load() -> Result<Self, CatalogError> {
        let path = resolve_catalog_path();
        let display = path.display().to_string();
        let contents = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: display.clone(),
            source,
        })?;
        let items: Vec<QuizItem> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: display,
                source,
            })?;
        Self::from_items(items)
    }

    /// Build a catalog from already-parsed items, validating each one.
    pub fn from_items(items: Vec<QuizItem>) -> Result<Self, CatalogError> {
        for (index, item) in items.iter().enumerate() {
            if item.path.trim().is_empty() {
                return Err(CatalogError::InvalidItem {
                    index,
                    reason: "picture path must not be empty".into(),
                });
            }
            if item.choices.len() < 2 {
                return Err(CatalogError::InvalidItem {
                    index,
                    reason: format!("expected at least 2 choices, got {}", item.choices.len()),
                });
            }
            if item.correct_index >= item.choices.len() {
                return Err(CatalogError::InvalidItem {
                    index,
                    reason: format!(
                        "correct_index {} is out of range for {} choices",
                        item.correct_index,
                        item.choices.len()
                    ),
                });
            }
        }
        Ok(Self { items })
    }

    /// Number of items available.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog contains no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pick one item uniformly at random, or `None` when the catalog is empty.
    pub fn random_item(&self) -> Option<&QuizItem> {
        self.items.choose(&mut rand::rng())
    }
}

/// Resolve the catalog path taking the environment override into account.
fn resolve_catalog_path() -> PathBuf {
    env::var_os(CATALOG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(path: &str, choices: &[&str], correct_index: usize) -> QuizItem {
        QuizItem {
            path: path.into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_index,
        }
    }

    #[test]
    fn valid_items_load() {
        let catalog = Catalog::from_items(vec![
            item("img/cat.jpg", &["cat", "dog", "fox"], 0),
            item("img/dog.jpg", &["cat", "dog"], 1),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.random_item().is_some());
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        let err = Catalog::from_items(vec![item("img/cat.jpg", &["cat", "dog"], 2)]).unwrap_err();
        match err {
            CatalogError::InvalidItem { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn single_choice_is_rejected() {
        assert!(Catalog::from_items(vec![item("img/cat.jpg", &["cat"], 0)]).is_err());
    }

    #[test]
    fn empty_catalog_yields_no_item() {
        let catalog = Catalog::from_items(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.random_item().is_none());
    }
}
