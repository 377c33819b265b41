//! Terminal app state and the session/timer wiring.
//!
//! The session and the timer never talk to each other. The app answers, then
//! advances, then restarts the timer; on timeout it registers a wrong answer,
//! advances and restarts. Timeouts arrive through the app event channel so the
//! session is only mutated from the UI loop.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::QuizConfig;
use crate::data::{validate_selection, QuestionBank};
use crate::models::{AppState, Question};
use crate::results::ResultReport;
use crate::session::{QuizSession, SessionError};
use crate::timer::{Timer, TimerSnapshot, TimerUrgency};

/// How long the right/wrong colours stay up before moving on.
const REVEAL_PAUSE: Duration = Duration::from_millis(500);

pub const MSG_NO_TOPICS_SELECTED: &str = "Select at least one topic.";
pub const MSG_NO_TOPICS_LOADED: &str = "None of the selected topics could be loaded.";

/// Events delivered to the app from background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The question timer ran out.
    Timeout,
    /// The reveal pause for the question at `index` is over.
    Advance { index: usize },
}

/// Outcome shown after an answer, until the quiz moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub chosen: usize,
    pub is_correct: bool,
}

pub struct App {
    pub state: AppState,
    bank: QuestionBank,
    shuffle_on_start: bool,
    topics: Vec<String>,
    selected_topics: Vec<bool>,
    menu_cursor: usize,
    menu_message: Option<&'static str>,
    session: QuizSession,
    timer: Timer,
    events: mpsc::UnboundedSender<AppEvent>,
    options: Vec<String>,
    selected_option: usize,
    reveal: Option<Reveal>,
    show_code: bool,
    result_scroll: usize,
}

impl App {
    pub fn new(config: &QuizConfig, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        let bank = QuestionBank::new(&config.questions_dir);
        let topics = bank.available_topics();
        let selected_topics = topics
            .iter()
            .map(|topic| config.topics.contains(topic))
            .collect();

        let timer = Timer::new(config.seconds_per_question);
        let timeout_events = events.clone();
        timer.set_on_timeout(move || {
            let _ = timeout_events.send(AppEvent::Timeout);
        });

        Self {
            state: AppState::Menu,
            bank,
            shuffle_on_start: config.shuffle,
            topics,
            selected_topics,
            menu_cursor: 0,
            menu_message: None,
            session: QuizSession::new(),
            timer,
            events,
            options: Vec::new(),
            selected_option: 0,
            reveal: None,
            show_code: false,
            result_scroll: 0,
        }
    }

    // Menu

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn is_topic_selected(&self, index: usize) -> bool {
        self.selected_topics.get(index).copied().unwrap_or(false)
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    pub fn menu_message(&self) -> Option<&'static str> {
        self.menu_message
    }

    pub fn menu_next(&mut self) {
        if !self.topics.is_empty() {
            self.menu_cursor = (self.menu_cursor + 1) % self.topics.len();
        }
    }

    pub fn menu_previous(&mut self) {
        if !self.topics.is_empty() {
            let len = self.topics.len();
            self.menu_cursor = (self.menu_cursor + len - 1) % len;
        }
    }

    pub fn toggle_topic(&mut self) {
        if let Some(selected) = self.selected_topics.get_mut(self.menu_cursor) {
            *selected = !*selected;
            self.menu_message = None;
        }
    }

    pub fn selected_topic_names(&self) -> Vec<String> {
        self.topics
            .iter()
            .zip(&self.selected_topics)
            .filter(|(_, selected)| **selected)
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    /// Load the selected topics and begin the quiz.
    ///
    /// Returns `Ok(false)` and sets a menu message when nothing could start.
    pub fn start_quiz(&mut self) -> Result<bool, SessionError> {
        let names = self.selected_topic_names();
        if !validate_selection(&names) {
            self.menu_message = Some(MSG_NO_TOPICS_SELECTED);
            return Ok(false);
        }

        let sets = self.bank.load_topics(&names);
        if sets.is_empty() {
            self.menu_message = Some(MSG_NO_TOPICS_LOADED);
            return Ok(false);
        }

        self.session.initialize_multiple(sets)?;
        if self.shuffle_on_start {
            self.session.shuffle()?;
        }

        tracing::info!(
            topics = ?names,
            questions = self.session.total_questions(),
            "quiz started"
        );
        self.menu_message = None;
        self.state = AppState::Quiz;
        self.show_current_question();
        self.timer.start();
        Ok(true)
    }

    pub fn back_to_menu(&mut self) {
        self.timer.stop();
        self.reveal = None;
        self.state = AppState::Menu;
    }

    // Quiz

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn timer_snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    pub fn timer_urgency(&self) -> TimerUrgency {
        self.timer.urgency()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn current_question_number(&self) -> usize {
        self.session.current_index() + 1
    }

    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn reveal(&self) -> Option<Reveal> {
        self.reveal
    }

    pub fn is_code_visible(&self) -> bool {
        self.show_code && self.current_question().is_some_and(|q| q.code().is_some())
    }

    pub fn select_next_option(&mut self) {
        if !self.options.is_empty() {
            self.selected_option = (self.selected_option + 1) % self.options.len();
        }
    }

    pub fn select_previous_option(&mut self) {
        if !self.options.is_empty() {
            let len = self.options.len();
            self.selected_option = (self.selected_option + len - 1) % len;
        }
    }

    pub fn toggle_code(&mut self) {
        self.show_code = !self.show_code;
    }

    /// Score the highlighted option, then advance after the reveal pause.
    ///
    /// Ignored once the countdown has expired: the queued timeout owns the
    /// question from then on.
    pub fn submit_answer(&mut self) -> Result<(), SessionError> {
        if self.state != AppState::Quiz
            || self.reveal.is_some()
            || !self.timer.is_running()
            || self.session.is_current_question_answered()
        {
            return Ok(());
        }

        let answer = self.options.get(self.selected_option).map(String::as_str);
        let is_correct = self.session.check_answer(answer)?;
        self.session.register_answer(is_correct);
        self.timer.stop();

        self.reveal = Some(Reveal {
            chosen: self.selected_option,
            is_correct,
        });

        let index = self.session.current_index();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(REVEAL_PAUSE).await;
            let _ = events.send(AppEvent::Advance { index });
        });
        Ok(())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Timeout => self.handle_timeout(),
            AppEvent::Advance { index } => {
                if self.state == AppState::Quiz
                    && self.reveal.is_some()
                    && self.session.current_index() == index
                {
                    self.reveal = None;
                    self.advance();
                }
            }
        }
    }

    fn handle_timeout(&mut self) {
        // A newer countdown or a pending reveal makes this timeout stale.
        if self.state != AppState::Quiz || self.reveal.is_some() || self.timer.is_running() {
            return;
        }

        if !self.session.is_current_question_answered() {
            self.session.register_timeout();
        }
        self.advance();
    }

    pub fn next_question(&mut self) {
        if self.state == AppState::Quiz && self.reveal.is_none() {
            self.advance();
        }
    }

    pub fn previous_question(&mut self) {
        if self.state == AppState::Quiz && self.reveal.is_none() {
            self.session.go_previous();
            self.show_current_question();
            self.timer.restart();
        }
    }

    pub fn shuffle_questions(&mut self) -> Result<(), SessionError> {
        if self.state != AppState::Quiz || self.reveal.is_some() {
            return Ok(());
        }

        self.session.shuffle()?;
        self.show_current_question();
        self.timer.restart();
        Ok(())
    }

    pub fn finish(&mut self) {
        if self.state == AppState::Quiz {
            self.show_result();
        }
    }

    fn advance(&mut self) {
        self.session.go_next();
        if self.session.is_finished() {
            self.show_result();
        } else {
            self.show_current_question();
            self.timer.restart();
        }
    }

    fn show_current_question(&mut self) {
        self.options = self
            .session
            .current_question()
            .map(|q| q.options(&mut rand::rng()))
            .unwrap_or_default();
        self.selected_option = 0;
        self.reveal = None;
        self.show_code = false;
    }

    fn show_result(&mut self) {
        self.timer.stop();
        self.reveal = None;
        self.result_scroll = 0;
        self.state = AppState::Result;
        tracing::info!(
            correct = self.session.correct_answers(),
            wrong = self.session.wrong_answers(),
            total = self.session.total_questions(),
            "quiz finished"
        );
    }

    // Result

    pub fn report(&self) -> ResultReport {
        ResultReport::from_session(&self.session)
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn scroll_results_down(&mut self) {
        if self.result_scroll + 1 < self.session.stats_by_topic().len() {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Leave the app cleanly.
    pub fn shutdown(&mut self) {
        self.timer.stop();
    }
}
