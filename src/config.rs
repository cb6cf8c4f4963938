//! Runtime configuration from the environment (and `.env` when present).
//!
//! | variable                    | default              |
//! |-----------------------------|----------------------|
//! | `FLIPCARDS_SOURCE`          | `flashcards.json`    |
//! | `FLIPCARDS_CARDS_PER_ROUND` | `5`                  |
//! | `FLIPCARDS_DB`              | `flipcards.sqlite3`  |

use crate::source::SourceLocation;
use std::path::PathBuf;

pub const SOURCE_VAR: &str = "FLIPCARDS_SOURCE";
pub const CARDS_PER_ROUND_VAR: &str = "FLIPCARDS_CARDS_PER_ROUND";
pub const DB_VAR: &str = "FLIPCARDS_DB";

pub const DEFAULT_SOURCE: &str = "flashcards.json";
pub const DEFAULT_CARDS_PER_ROUND: usize = 5;
pub const DEFAULT_DB: &str = "flipcards.sqlite3";

/// Loads `.env` into the process environment if the file exists.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// `None` when the environment does not name a source; the app then falls
    /// back to the last opened deck or [`DEFAULT_SOURCE`].
    pub source: Option<SourceLocation>,
    pub cards_per_round: usize,
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            cards_per_round: DEFAULT_CARDS_PER_ROUND,
            database_path: PathBuf::from(DEFAULT_DB),
        }
    }
}

impl Config {
    /// Reads the process environment. Call [`load_dotenv`] first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            source: non_blank(SOURCE_VAR).map(|v| SourceLocation::parse(&v)),
            cards_per_round: parse_cards_per_round(lookup(CARDS_PER_ROUND_VAR).as_deref()),
            database_path: non_blank(DB_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB)),
        }
    }

    /// Configured source, or `fallback`, or [`DEFAULT_SOURCE`].
    pub fn source_or(&self, fallback: Option<&str>) -> SourceLocation {
        self.source
            .clone()
            .unwrap_or_else(|| SourceLocation::parse(fallback.unwrap_or(DEFAULT_SOURCE)))
    }
}

/// Positive integer, otherwise the default.
fn parse_cards_per_round(value: Option<&str>) -> usize {
    match value.map(str::trim).map(str::parse::<usize>) {
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            tracing::warn!(
                value = value.unwrap_or_default(),
                default = DEFAULT_CARDS_PER_ROUND,
                "invalid cards per round, using default"
            );
            DEFAULT_CARDS_PER_ROUND
        }
        None => DEFAULT_CARDS_PER_ROUND,
    }
}
