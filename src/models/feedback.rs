//! Signals emitted by session operations for the presentation layer.
use super::Mode;
use std::fmt;

/// Outcome of a session operation worth telling the user about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
    Learned,
    /// Quiz round exhausted; accuracy is the final percentage.
    RoundComplete { accuracy: u8 },
    /// The operation was rejected and left the session unchanged.
    Advisory(Advisory),
}

/// Reasons an operation was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advisory {
    SelectAnswerFirst,
    AlreadyAnswered,
    UnknownOption,
    Unavailable(Mode),
    NoCards,
    Reshuffling,
}

impl Feedback {
    pub fn is_positive(&self) -> bool {
        matches!(self, Feedback::Correct | Feedback::Learned)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Feedback::Incorrect)
    }

    pub fn is_advisory(&self) -> bool {
        matches!(self, Feedback::Advisory(_))
    }

    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            Feedback::Advisory(a) => Some(*a),
            _ => None,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "🎉 Correct!"),
            Feedback::Incorrect => write!(f, "❌ Incorrect!"),
            Feedback::Learned => write!(f, "✅ Marked as learned"),
            Feedback::RoundComplete { accuracy } => write!(f, "Round complete: {accuracy}%"),
            Feedback::Advisory(advisory) => write!(f, "⚠️ {advisory}"),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::SelectAnswerFirst => write!(f, "Select an answer first!"),
            Advisory::AlreadyAnswered => write!(f, "You already answered this card"),
            Advisory::UnknownOption => write!(f, "That option is not available"),
            Advisory::Unavailable(mode) => write!(f, "Not available in {mode}"),
            Advisory::NoCards => write!(f, "No cards loaded"),
            Advisory::Reshuffling => write!(f, "Shuffling a new set..."),
        }
    }
}
