//! Discrete user actions shared by keyboard and pointer controls.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Flip,
    Next,
    Previous,
    MarkLearned,
    /// 1-based option number as shown next to each choice.
    SelectOption(usize),
}

/// Highest option number reachable from the keyboard.
pub const MAX_OPTION_KEY: usize = 4;
