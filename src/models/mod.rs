mod question;

pub use question::{Question, QuestionSet};

/// Which screen the terminal app is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Quiz,
    Result,
}
