use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Question, QuestionSet};

const TOPIC_EXTENSION: &str = "json";
const MIN_DISTRACTORS: usize = 3;

/// Errors raised while loading a topic file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("topic name must not be blank")]
    InvalidName,

    #[error("topic '{topic}' not found at {}", .path.display())]
    NotFound { topic: String, path: PathBuf },

    #[error("failed to read topic '{topic}': {source}")]
    Io {
        topic: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in topic '{topic}': {source}")]
    Malformed {
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid data in topic '{topic}': {details}")]
    InvalidData { topic: String, details: String },
}

#[derive(Deserialize)]
struct TopicFile {
    #[serde(default)]
    questions: Vec<Question>,
}

/// A directory of `<TOPIC>.json` question files.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    dir: PathBuf,
}

impl QuestionBank {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sorted names of every topic file in the bank.
    pub fn available_topics(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(dir = %self.dir.display(), error = %err, "cannot list topics");
                return Vec::new();
            }
        };

        let mut topics: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == TOPIC_EXTENSION))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .collect();
        topics.sort();
        topics
    }

    pub fn topic_exists(&self, topic: &str) -> bool {
        !topic.trim().is_empty() && self.topic_path(topic).is_file()
    }

    /// Load and validate one topic file.
    pub fn load_topic(&self, topic: &str) -> Result<QuestionSet, LoadError> {
        if topic.trim().is_empty() {
            return Err(LoadError::InvalidName);
        }

        tracing::info!(topic, "loading topic");
        let path = self.topic_path(topic);

        let json_content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                tracing::error!(topic, path = %path.display(), "topic file not found");
                LoadError::NotFound {
                    topic: topic.to_string(),
                    path: path.clone(),
                }
            } else {
                tracing::error!(topic, error = %source, "failed to read topic file");
                LoadError::Io {
                    topic: topic.to_string(),
                    source,
                }
            }
        })?;

        let file: TopicFile = serde_json::from_str(&json_content).map_err(|source| {
            tracing::error!(topic, error = %source, "malformed topic file");
            LoadError::Malformed {
                topic: topic.to_string(),
                source,
            }
        })?;

        validate_questions(topic, &file.questions)?;

        let mut questions = file.questions;
        for question in &mut questions {
            question.inherit_topic(topic);
        }

        tracing::info!(topic, count = questions.len(), "topic loaded");
        Ok(QuestionSet::new(topic, questions))
    }

    /// Load several topics, logging and skipping the ones that fail.
    pub fn load_topics<S: AsRef<str>>(&self, topics: &[S]) -> Vec<QuestionSet> {
        topics
            .iter()
            .filter_map(|topic| match self.load_topic(topic.as_ref()) {
                Ok(set) => Some(set),
                Err(err) => {
                    tracing::warn!(topic = topic.as_ref(), error = %err, "skipping topic");
                    None
                }
            })
            .collect()
    }

    fn topic_path(&self, topic: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", topic, TOPIC_EXTENSION))
    }
}

/// True when at least one topic has been picked.
pub fn validate_selection<S: AsRef<str>>(topics: &[S]) -> bool {
    !topics.is_empty()
}

fn validate_questions(topic: &str, questions: &[Question]) -> Result<(), LoadError> {
    let invalid = |details: String| LoadError::InvalidData {
        topic: topic.to_string(),
        details,
    };

    if questions.is_empty() {
        return Err(invalid("no questions".to_string()));
    }

    for (index, question) in questions.iter().enumerate() {
        if question.text().trim().is_empty() {
            return Err(invalid(format!("question {} has no text", index)));
        }
        if question.correct_answer().trim().is_empty() {
            return Err(invalid(format!("question {} has no correct answer", index)));
        }
        if question.distractors().len() < MIN_DISTRACTORS {
            return Err(invalid(format!(
                "question {} needs at least {} wrong options",
                index, MIN_DISTRACTORS
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID: &str = r#"{
        "questions": [
            {"Q": "What does `?` do?", "A": "Propagates errors", "X": ["Panics", "Ignores errors", "Logs errors"], "position": 1, "topic": "Errors"},
            {"Q": "Which trait converts errors?", "A": "From", "X": ["Into", "AsRef", "Borrow"], "position": 2, "code": "impl From<io::Error> for MyError {}"}
        ]
    }"#;

    fn bank_with(files: &[(&str, &str)]) -> (TempDir, QuestionBank) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let bank = QuestionBank::new(dir.path());
        (dir, bank)
    }

    #[test]
    fn test_available_topics_sorted_json_only() {
        let (_dir, bank) = bank_with(&[
            ("ERRORS.json", VALID),
            ("A-BASICS.json", VALID),
            ("notes.txt", "ignored"),
        ]);
        assert_eq!(bank.available_topics(), vec!["A-BASICS", "ERRORS"]);
    }

    #[test]
    fn test_available_topics_missing_dir() {
        let bank = QuestionBank::new("/definitely/not/a/question/bank");
        assert!(bank.available_topics().is_empty());
    }

    #[test]
    fn test_load_topic() {
        let (_dir, bank) = bank_with(&[("ERRORS.json", VALID)]);
        let set = bank.load_topic("ERRORS").unwrap();

        assert_eq!(set.topic, "ERRORS");
        assert_eq!(set.len(), 2);
        assert_eq!(set.questions[0].topic(), "Errors");
        assert_eq!(set.questions[1].topic(), "ERRORS");
        assert!(set.questions[1].code().is_some());
    }

    #[test]
    fn test_topic_exists() {
        let (_dir, bank) = bank_with(&[("ERRORS.json", VALID)]);
        assert!(bank.topic_exists("ERRORS"));
        assert!(!bank.topic_exists("TRAITS"));
        assert!(!bank.topic_exists("  "));
    }

    #[test]
    fn test_load_errors() {
        let (_dir, bank) = bank_with(&[
            ("BROKEN.json", "{ not json"),
            ("EMPTY.json", r#"{"questions": []}"#),
            (
                "SHORT.json",
                r#"{"questions": [{"Q": "q", "A": "a", "X": ["b", "c"]}]}"#,
            ),
            (
                "NOANSWER.json",
                r#"{"questions": [{"Q": "q", "A": " ", "X": ["b", "c", "d"]}]}"#,
            ),
        ]);

        assert!(matches!(bank.load_topic(""), Err(LoadError::InvalidName)));
        assert!(matches!(bank.load_topic("MISSING"), Err(LoadError::NotFound { .. })));
        assert!(matches!(bank.load_topic("BROKEN"), Err(LoadError::Malformed { .. })));
        assert!(matches!(bank.load_topic("EMPTY"), Err(LoadError::InvalidData { .. })));
        assert!(matches!(bank.load_topic("SHORT"), Err(LoadError::InvalidData { .. })));
        assert!(matches!(bank.load_topic("NOANSWER"), Err(LoadError::InvalidData { .. })));
    }

    #[test]
    fn test_load_topics_skips_failures() {
        let (_dir, bank) = bank_with(&[("ERRORS.json", VALID), ("BROKEN.json", "[]")]);
        let sets = bank.load_topics(&["ERRORS", "BROKEN", "MISSING"]);

        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].topic, "ERRORS");
    }

    #[test]
    fn test_validate_selection() {
        assert!(validate_selection(&["ERRORS"]));
        assert!(!validate_selection::<&str>(&[]));
    }
}
