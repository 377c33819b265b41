//! Quiz session state machine.
//!
//! A session owns the flattened question list, the current position and all
//! scoring bookkeeping. It has two observable states: in progress
//! (`current_index < total`) and finished (`current_index == total`). The
//! finished state is the index sentinel itself, so callers check
//! [`QuizSession::is_finished`] before expecting a current question.
//!
//! Answer registration does not guard against double counting. Callers check
//! [`QuizSession::is_current_question_answered`] before registering.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use thiserror::Error;

use crate::models::{Question, QuestionSet};

/// Errors returned by session operations. None of them mutate the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session was given no questions at all.
    #[error("a quiz session needs at least one question")]
    EmptyInput,
    /// A required argument was missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The operation needs a current question and there is none.
    #[error("no current question: {0}")]
    IllegalState(&'static str),
    /// `reset`/`shuffle` before any successful initialization.
    #[error("quiz session has not been initialized")]
    NotInitialized,
}

/// Correct and wrong counts for one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicStats {
    pub correct: usize,
    pub wrong: usize,
}

impl TopicStats {
    pub fn total(&self) -> usize {
        self.correct + self.wrong
    }
}

/// One row of the per-topic breakdown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRow {
    pub topic: String,
    pub correct: usize,
    pub wrong: usize,
}

#[derive(Debug, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    correct_count: usize,
    wrong_count: usize,
    answered: HashSet<usize>,
    stats_by_topic: BTreeMap<String, TopicStats>,
}

impl QuizSession {
    /// An empty, uninitialized session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and initialize a session in one step.
    pub fn with_questions(questions: Vec<Question>) -> Result<Self, SessionError> {
        let mut session = Self::new();
        session.initialize(questions)?;
        Ok(session)
    }

    /// Replace the question list and clear all progress.
    pub fn initialize(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        tracing::debug!(total = questions.len(), "initializing quiz session");
        self.questions = questions;
        self.clear_progress();
        Ok(())
    }

    /// Concatenate several sets, in set order then question order.
    pub fn initialize_multiple(&mut self, sets: Vec<QuestionSet>) -> Result<(), SessionError> {
        if sets.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let questions: Vec<Question> = sets.into_iter().flat_map(|set| set.questions).collect();
        self.initialize(questions)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Case-sensitive comparison against the current correct answer.
    ///
    /// `None` stands for "no answer given" and is rejected.
    pub fn check_answer(&self, answer: Option<&str>) -> Result<bool, SessionError> {
        let answer = answer.ok_or(SessionError::InvalidArgument("answer must be provided"))?;
        let question = self
            .current_question()
            .ok_or(SessionError::IllegalState("the quiz has already finished"))?;
        Ok(answer == question.correct_answer())
    }

    /// Score the current question. No-op when finished.
    pub fn register_answer(&mut self, is_correct: bool) {
        let Some(topic) = self.current_question().map(|q| q.topic().to_string()) else {
            return;
        };

        let stats = self.stats_by_topic.entry(topic).or_default();
        if is_correct {
            self.correct_count += 1;
            stats.correct += 1;
        } else {
            self.wrong_count += 1;
            stats.wrong += 1;
        }
        self.answered.insert(self.current_index);

        tracing::debug!(
            index = self.current_index,
            is_correct,
            correct = self.correct_count,
            wrong = self.wrong_count,
            "answer registered"
        );
    }

    /// Score the current question as wrong because time ran out.
    pub fn register_timeout(&mut self) {
        tracing::debug!(index = self.current_index, "question timed out");
        self.register_answer(false);
    }

    pub fn is_current_question_answered(&self) -> bool {
        self.answered.contains(&self.current_index)
    }

    /// Move forward one question. Stops at the finished sentinel.
    pub fn go_next(&mut self) {
        if self.current_index < self.questions.len() {
            self.current_index += 1;
        }
    }

    /// Move back one question. Stays at the first question.
    pub fn go_previous(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Uniformly permute the questions and start over.
    pub fn shuffle(&mut self) -> Result<(), SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::NotInitialized);
        }

        self.questions.shuffle(&mut rand::rng());
        self.reset()
    }

    /// Back to the first question with all counters cleared.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::NotInitialized);
        }

        self.clear_progress();
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_count
    }

    pub fn wrong_answers(&self) -> usize {
        self.wrong_count
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Live, read-only view of the per-topic counters.
    pub fn stats_by_topic(&self) -> &BTreeMap<String, TopicStats> {
        &self.stats_by_topic
    }

    /// Owned per-topic rows, ordered by topic.
    pub fn topic_stats(&self) -> Vec<TopicRow> {
        self.stats_by_topic
            .iter()
            .map(|(topic, stats)| TopicRow {
                topic: topic.clone(),
                correct: stats.correct,
                wrong: stats.wrong,
            })
            .collect()
    }

    fn clear_progress(&mut self) {
        self.current_index = 0;
        self.correct_count = 0;
        self.wrong_count = 0;
        self.answered.clear();
        self.stats_by_topic.clear();
    }
}
