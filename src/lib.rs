pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod source;

pub use error::{Error, Result};
pub use models::{Action, Advisory, Card, Feedback, Mode, Round, Session, Theme, select_round};
