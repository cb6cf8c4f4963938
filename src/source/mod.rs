//! Where card collections come from.
//!
//! A source is read exactly once per load. Loading runs off the UI thread and
//! the result is picked up by polling a [`PendingLoad`].

pub mod http;
pub mod json;

pub use http::HttpSource;
pub use json::{JsonFileSource, parse_cards};

use crate::error::{Error, Result};
use crate::models::Card;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

pub trait CardSource {
    fn load(&self) -> Result<Vec<Card>>;

    /// Human readable location, used in logs and error messages.
    fn describe(&self) -> String;
}

/// Configured location of the card collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceLocation {
    File(PathBuf),
    Url(String),
}

impl SourceLocation {
    /// `http://` and `https://` locations are fetched; anything else is a path.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocation::Url(text.to_string())
        } else {
            SourceLocation::File(PathBuf::from(text))
        }
    }

    pub fn into_source(self) -> Box<dyn CardSource + Send> {
        match self {
            SourceLocation::File(path) => Box::new(JsonFileSource::new(path)),
            SourceLocation::Url(url) => Box::new(HttpSource::new(url)),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::File(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => f.write_str(url),
        }
    }
}

/// A load running on a background thread.
pub struct PendingLoad {
    location: String,
    rx: Receiver<Result<Vec<Card>>>,
}

impl PendingLoad {
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the outcome once the load has finished, `None` while it runs.
    pub fn poll(&self) -> Option<Result<Vec<Card>>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::unavailable(
                &self.location,
                "loader stopped before returning cards",
            ))),
        }
    }
}

/// Starts loading `source` on its own thread.
///
/// `on_done` runs on the loader thread after the result is sent, so the UI
/// can request a repaint.
pub fn spawn_load<F>(source: Box<dyn CardSource + Send>, on_done: F) -> PendingLoad
where
    F: FnOnce() + Send + 'static,
{
    let location = source.describe();
    let (tx, rx) = mpsc::channel();

    tracing::info!(source = %location, "loading cards");
    std::thread::spawn(move || {
        let result = source.load();
        if let Err(e) = &result {
            tracing::warn!(error = %e, "card source failed");
        }
        let _ = tx.send(result);
        on_done();
    });

    PendingLoad { location, rx }
}
