use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::LoadError;
use crate::session::SessionError;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("Quiz session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
