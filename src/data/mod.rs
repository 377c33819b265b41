mod loader;

pub use loader::{validate_selection, LoadError, QuestionBank};
