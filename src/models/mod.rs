pub mod action;
pub mod card;
pub mod feedback;
pub mod round;
pub mod session;
pub mod summary;
pub mod theme;

pub use action::{Action, MAX_OPTION_KEY};
pub use card::Card;
pub use feedback::{Advisory, Feedback};
pub use round::{Round, select_round};
pub use session::{Mode, Session};
pub use summary::{AccuracyBand, QuizSummary};
pub use theme::Theme;
