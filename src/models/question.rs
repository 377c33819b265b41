use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

/// A single multiple-choice question as stored in a topic file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    #[serde(rename = "Q")]
    text: String,
    #[serde(rename = "A")]
    correct_answer: String,
    #[serde(rename = "X")]
    distractors: Vec<String>,
    #[serde(default)]
    position: u32,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    code: Option<String>,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        distractors: Vec<String>,
        position: u32,
        topic: impl Into<String>,
        code: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            correct_answer: correct_answer.into(),
            distractors,
            position,
            topic: topic.into(),
            code,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn distractors(&self) -> &[String] {
        &self.distractors
    }

    /// 1-based display order within the source topic file.
    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The code snippet, if the question carries a non-empty one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.trim().is_empty())
    }

    /// Correct answer and distractors in random order.
    pub fn options<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut options = Vec::with_capacity(self.distractors.len() + 1);
        options.extend(self.distractors.iter().cloned());
        options.push(self.correct_answer.clone());
        options.shuffle(rng);
        options
    }

    pub(crate) fn inherit_topic(&mut self, topic: &str) {
        if self.topic.trim().is_empty() {
            self.topic = topic.to_string();
        }
    }
}

/// Questions loaded from one topic file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    pub topic: String,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(topic: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            topic: topic.into(),
            questions,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Question {
        Question::new(
            "What does `Box<T>` allocate on?",
            "The heap",
            vec!["The stack".into(), "A register".into(), "Static memory".into()],
            1,
            "Memory",
            Some("let b = Box::new(5);".into()),
        )
    }

    #[test]
    fn test_options_contain_every_answer_once() {
        let question = sample();
        let mut options = question.options(&mut rand::rng());
        options.sort();

        let mut expected = vec![
            "A register".to_string(),
            "Static memory".to_string(),
            "The heap".to_string(),
            "The stack".to_string(),
        ];
        expected.sort();
        assert_eq!(options, expected);
    }

    #[test]
    fn test_blank_code_is_hidden() {
        let question = Question::new("q", "a", vec![], 1, "t", Some("   ".into()));
        assert_eq!(question.code(), None);
        assert_eq!(sample().code(), Some("let b = Box::new(5);"));
    }

    #[test]
    fn test_deserialize_bank_keys() {
        let json = r#"{"Q":"Which keyword moves?","A":"move","X":["ref","mut","dyn"],"position":3}"#;
        let mut question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.text(), "Which keyword moves?");
        assert_eq!(question.correct_answer(), "move");
        assert_eq!(question.distractors().len(), 3);
        assert_eq!(question.position(), 3);
        assert_eq!(question.topic(), "");
        assert_eq!(question.code(), None);

        question.inherit_topic("Closures");
        assert_eq!(question.topic(), "Closures");
        question.inherit_topic("Other");
        assert_eq!(question.topic(), "Closures");
    }
}
