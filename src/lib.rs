//! # topic-quiz
//!
//! A timed, topic-based terminal quiz.
//!
//! The core is the [`QuizSession`] state machine, the per-question [`Timer`]
//! and the [`results`] helpers. The terminal app wires them together: answer,
//! advance, restart the timer; or on timeout, score a wrong answer, advance,
//! restart.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use topic_quiz::{Quiz, QuizConfig, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = QuizConfig {
//!         topics: vec!["OOP".to_string()],
//!         ..QuizConfig::default()
//!     };
//!
//!     Quiz::new(config)?.run().await
//! }
//! ```

mod app;
mod config;
mod data;
mod error;
mod models;
pub mod results;
pub mod session;
pub mod terminal;
pub mod timer;
mod ui;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc;

pub use app::{App, AppEvent, Reveal};
pub use config::{ConfigError, DEFAULT_LOG_FILE, DEFAULT_QUESTIONS_DIR, QuizConfig};
pub use data::{LoadError, QuestionBank, validate_selection};
pub use error::QuizError;
pub use models::{AppState, Question, QuestionSet};
pub use results::{ResultReport, ScoreBand, calculate_score, feedback_message, format_score_text};
pub use session::{QuizSession, SessionError, TopicRow, TopicStats};
pub use timer::{Timer, TimerSnapshot, TimerUrgency};

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
    events: mpsc::UnboundedReceiver<AppEvent>,
    start_immediately: bool,
}

impl Quiz {
    /// Build the quiz from a validated configuration.
    ///
    /// When `config.topics` is non-empty those topics are preselected and the
    /// quiz skips the topic menu.
    pub fn new(config: QuizConfig) -> Result<Self, QuizError> {
        config.validate()?;

        let (tx, events) = mpsc::unbounded_channel();
        Ok(Self {
            app: App::new(&config, tx),
            events,
            start_immediately: !config.topics.is_empty(),
        })
    }

    /// Run the quiz in the terminal.
    ///
    /// This takes over the terminal and returns when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        if self.start_immediately {
            self.app.start_quiz()?;
        }

        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, &mut self.events).await;
        self.app.shutdown();
        terminal::restore()?;
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<(), QuizError> {
    let mut keys = EventStream::new();
    let mut countdown = app.timer().subscribe();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            key_event = keys.next() => match key_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_input(app, key.code)? {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(event) = events.recv() => app.handle_event(event),
            // Redraw on every countdown tick.
            _ = countdown.changed() => {}
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> Result<bool, QuizError> {
    match app.state {
        AppState::Menu => handle_menu_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => Ok(handle_result_input(app, key)),
    }
}

fn handle_menu_input(app: &mut App, key: KeyCode) -> Result<bool, QuizError> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.menu_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Char(' ') => app.toggle_topic(),
        KeyCode::Enter => {
            app.start_quiz()?;
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
        _ => {}
    }
    Ok(false)
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Result<bool, QuizError> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer()?,
        KeyCode::Right | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_question(),
        KeyCode::Char('s') => app.shuffle_questions()?,
        KeyCode::Char('c') => app.toggle_code(),
        KeyCode::Char('f') => app.finish(),
        KeyCode::Char('m') | KeyCode::Esc => app.back_to_menu(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.back_to_menu(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
