//! Card is a question with its answer. Quiz-capable cards also carry the
//! multiple-choice options shown to the user.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            options: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Options for multiple choice. An empty list counts as no options.
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    pub fn has_options(&self) -> bool {
        !self.options().is_empty()
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    /// Free-form cards accept any text; otherwise it must be one of the options.
    pub fn accepts(&self, option: &str) -> bool {
        !self.has_options() || self.options().iter().any(|o| o == option)
    }
}
