use std::path::PathBuf;

use thiserror::Error;

use crate::timer::DEFAULT_SECONDS;

pub const DEFAULT_QUESTIONS_DIR: &str = "questions";
pub const DEFAULT_LOG_FILE: &str = "topic-quiz.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the per-question time limit must be at least one second")]
    ZeroTimeLimit,
}

/// Runtime settings for a quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Directory holding the `<TOPIC>.json` files.
    pub questions_dir: PathBuf,
    /// Topics to start with directly, skipping the menu when non-empty.
    pub topics: Vec<String>,
    pub seconds_per_question: u32,
    /// Shuffle the questions right after loading.
    pub shuffle: bool,
    pub log_file: PathBuf,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_dir: PathBuf::from(DEFAULT_QUESTIONS_DIR),
            topics: Vec::new(),
            seconds_per_question: DEFAULT_SECONDS,
            shuffle: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl QuizConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seconds_per_question == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}
