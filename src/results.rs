//! Final score report helpers.

use crate::session::{QuizSession, TopicRow};

pub const FEEDBACK_FAIL: &str = "Oh no..! You have failed the quiz. Practice daily!";
pub const FEEDBACK_LOW: &str = "Oops..! Low score. Improve your knowledge.";
pub const FEEDBACK_GOOD: &str = "Good. Keep practicing for better results.";
pub const FEEDBACK_WELL: &str = "Congratulations! You scored well.";
pub const FEEDBACK_PERFECT: &str = "Perfect! Full marks, excellent work!";

const FAIL_THRESHOLD: f64 = 0.2;
const LOW_THRESHOLD: f64 = 0.5;
const GOOD_THRESHOLD: f64 = 0.7;
const EXCELLENT_THRESHOLD: f64 = 0.9;

/// Fraction of correct answers, `0.0` for an empty quiz.
pub fn calculate_score(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64
}

pub fn feedback_message(score: f64) -> &'static str {
    if score < FAIL_THRESHOLD {
        FEEDBACK_FAIL
    } else if score < LOW_THRESHOLD {
        FEEDBACK_LOW
    } else if score <= GOOD_THRESHOLD {
        FEEDBACK_GOOD
    } else if score <= EXCELLENT_THRESHOLD {
        FEEDBACK_WELL
    } else {
        FEEDBACK_PERFECT
    }
}

pub fn format_score_text(correct: usize, total: usize) -> String {
    format!("{}/{} Marks Score", correct, total)
}

/// Coarse grade used to colour the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score < LOW_THRESHOLD {
            Self::Poor
        } else if score < GOOD_THRESHOLD {
            Self::Fair
        } else if score < EXCELLENT_THRESHOLD {
            Self::Good
        } else {
            Self::Excellent
        }
    }
}

/// Everything the results screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultReport {
    pub correct: usize,
    pub wrong: usize,
    pub total: usize,
    pub score: f64,
    pub feedback: &'static str,
    pub score_text: String,
    pub band: ScoreBand,
    pub topics: Vec<TopicRow>,
}

impl ResultReport {
    pub fn from_session(session: &QuizSession) -> Self {
        let correct = session.correct_answers();
        let total = session.total_questions();
        let score = calculate_score(correct, total);

        Self {
            correct,
            wrong: session.wrong_answers(),
            total,
            score,
            feedback: feedback_message(score),
            score_text: format_score_text(correct, total),
            band: ScoreBand::from_score(score),
            topics: session.topic_stats(),
        }
    }

    /// Share of questions answered wrong, for the wrong-answer gauge.
    pub fn wrong_ratio(&self) -> f64 {
        calculate_score(self.wrong, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    #[test]
    fn test_calculate_score() {
        assert_eq!(calculate_score(9, 10), 0.9);
        assert_eq!(calculate_score(5, 10), 0.5);
        assert_eq!(calculate_score(0, 0), 0.0);
        assert_eq!(calculate_score(3, 3), 1.0);
    }

    #[test]
    fn test_feedback_bands() {
        assert_eq!(feedback_message(0.0), FEEDBACK_FAIL);
        assert_eq!(feedback_message(0.19), FEEDBACK_FAIL);
        assert_eq!(feedback_message(0.2), FEEDBACK_LOW);
        assert_eq!(feedback_message(0.49), FEEDBACK_LOW);
        assert_eq!(feedback_message(0.5), FEEDBACK_GOOD);
        assert_eq!(feedback_message(0.7), FEEDBACK_GOOD);
        assert_eq!(feedback_message(0.8), FEEDBACK_WELL);
        assert_eq!(feedback_message(0.9), FEEDBACK_WELL);
        assert_eq!(feedback_message(0.95), FEEDBACK_PERFECT);
        assert_eq!(feedback_message(1.0), FEEDBACK_PERFECT);
    }

    #[test]
    fn test_feedback_from_counts() {
        assert_eq!(
            feedback_message(calculate_score(9, 10)),
            "Congratulations! You scored well."
        );
        assert_eq!(
            feedback_message(calculate_score(5, 10)),
            "Good. Keep practicing for better results."
        );
    }

    #[test]
    fn test_format_score_text() {
        assert_eq!(format_score_text(7, 10), "7/10 Marks Score");
        assert_eq!(format_score_text(0, 0), "0/0 Marks Score");
    }

    #[test]
    fn test_score_band() {
        assert_eq!(ScoreBand::from_score(0.49), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0.5), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0.7), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(0.9), ScoreBand::Excellent);
    }

    #[test]
    fn test_report_from_session() {
        let questions = (1..=4)
            .map(|i| {
                Question::new(
                    format!("question {}", i),
                    "yes",
                    vec!["no".into(), "maybe".into(), "never".into()],
                    i,
                    if i % 2 == 0 { "Even" } else { "Odd" },
                    None,
                )
            })
            .collect();
        let mut session = QuizSession::with_questions(questions).unwrap();
        for is_correct in [true, true, true, false] {
            session.register_answer(is_correct);
            session.go_next();
        }

        let report = ResultReport::from_session(&session);
        assert_eq!(report.correct, 3);
        assert_eq!(report.wrong, 1);
        assert_eq!(report.score, 0.75);
        assert_eq!(report.feedback, FEEDBACK_WELL);
        assert_eq!(report.score_text, "3/4 Marks Score");
        assert_eq!(report.band, ScoreBand::Good);
        assert_eq!(report.wrong_ratio(), 0.25);
        assert_eq!(report.topics.len(), 2);
        assert_eq!(report.topics[0].topic, "Even");
        assert_eq!((report.topics[0].correct, report.topics[0].wrong), (1, 1));
    }
}
