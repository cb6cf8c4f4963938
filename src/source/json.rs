//! JSON card collections.
//! A collection is a JSON array of `{ "question", "answer", "options"? }` objects.

use super::CardSource;
use crate::error::{Error, Result};
use crate::models::Card;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Parses a card collection, refusing an empty one.
/// `location` is only used to describe the source in errors.
pub fn parse_cards(contents: &str, location: &str) -> Result<Vec<Card>> {
    let cards: Vec<Card> =
        serde_json::from_str(contents).map_err(|source| Error::MalformedSource {
            location: location.to_string(),
            source,
        })?;

    if cards.is_empty() {
        return Err(Error::EmptySource);
    }
    Ok(cards)
}

/// Card collection stored in a local JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CardSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Card>> {
        let location = self.describe();
        let mut file = File::open(&self.path).map_err(|e| Error::unavailable(&location, e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| Error::unavailable(&location, e))?;

        let cards = parse_cards(&contents, &location)?;
        tracing::info!(cards = cards.len(), path = %location, "loaded cards from file");
        Ok(cards)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_load_cards_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        fs::write(
            &path,
            r#"[
  {
    "question": "What does HTML stand for?",
    "answer": "HyperText Markup Language",
    "options": ["HyperText Markup Language", "High Tech Modern Language"]
  },
  {
    "question": "Who wrote Hamlet?",
    "answer": "Shakespeare"
  }
]"#,
        )
        .unwrap();

        let cards = JsonFileSource::new(&path).load().unwrap();

        assert_eq!(
            cards,
            vec![
                Card::new("What does HTML stand for?", "HyperText Markup Language")
                    .with_options(["HyperText Markup Language", "High Tech Modern Language"]),
                Card::new("Who wrote Hamlet?", "Shakespeare"),
            ]
        );
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = JsonFileSource::new("nonexistent_file_xyz123.json").load();
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result = parse_cards("{ this is not valid json }", "test");
        assert!(matches!(result, Err(Error::MalformedSource { .. })));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let result = parse_cards(r#"{"name": "deck", "flashcards": []}"#, "test");
        assert!(matches!(result, Err(Error::MalformedSource { .. })));
    }

    #[test]
    fn test_empty_array_is_empty_source() {
        let result = parse_cards("[]", "test");
        assert!(matches!(result, Err(Error::EmptySource)));
    }
}
