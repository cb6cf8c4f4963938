//! End-of-round quiz results.
use super::Card;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccuracyBand {
    Strong,
    Fair,
    Weak,
}

impl AccuracyBand {
    pub fn for_accuracy(accuracy: u8) -> Self {
        match accuracy {
            81.. => AccuracyBand::Strong,
            51..=80 => AccuracyBand::Fair,
            _ => AccuracyBand::Weak,
        }
    }
}

/// Snapshot of a quiz round, borrowed from the session.
#[derive(Debug, PartialEq)]
pub struct QuizSummary<'a> {
    pub score: u32,
    pub attempts: u32,
    pub round_len: usize,
    pub accuracy: u8,
    /// Cards answered incorrectly, in the order they were missed.
    pub missed: Vec<&'a Card>,
}

impl QuizSummary<'_> {
    pub fn band(&self) -> AccuracyBand {
        AccuracyBand::for_accuracy(self.accuracy)
    }

    pub fn has_missed(&self) -> bool {
        !self.missed.is_empty()
    }
}
