//! Error types for the flashcard app.
//!
//! Hard errors only: anything that stops a card collection from being
//! loaded, or the preferences store from working. Rejected user actions are
//! not errors; they come back from the session as advisory feedback.

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("card source {location} is unavailable: {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("card source {location} is malformed: {source}")]
    MalformedSource {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("card source contains no cards")]
    EmptySource,

    #[error("preferences database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    /// Whether the error should be shown on the terminal error screen.
    ///
    /// Database failures only degrade preferences and never block a session.
    pub fn is_source_error(&self) -> bool {
        !matches!(self, Error::Database(_))
    }

    pub(crate) fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Error::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
