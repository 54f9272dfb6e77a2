use crate::random::{RandomSource, fisher_yates};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selectable answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("no answer marked correct for question {0:?}")]
    NoCorrectAnswer(String),

    #[error("{count} answers marked correct for question {prompt:?}")]
    MultipleCorrectAnswers { prompt: String, count: usize },
}

/// Prompt plus answer options, exactly one of which is correct.
///
/// Questions are created once when the bank is loaded and are never mutated
/// after they have been placed in a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    answers: Vec<Answer>,
    stimulus: Option<String>,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        answers: Vec<Answer>,
        stimulus: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        match answers.iter().filter(|a| a.is_correct).count() {
            1 => Ok(Self {
                prompt,
                answers,
                stimulus: stimulus.filter(|s| !s.is_empty()),
            }),
            0 => Err(QuestionError::NoCorrectAnswer(prompt)),
            count => Err(QuestionError::MultipleCorrectAnswers { prompt, count }),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Answer option texts in display order
    pub fn answer_texts(&self) -> Vec<&str> {
        self.answers.iter().map(|a| a.text.as_str()).collect()
    }

    pub fn correct_answer(&self) -> &str {
        self.answers
            .iter()
            .find(|a| a.is_correct)
            .map(|a| a.text.as_str())
            .unwrap_or_default()
    }

    pub fn stimulus(&self) -> Option<&str> {
        self.stimulus.as_deref()
    }

    /// Randomises which position each option is displayed in.
    pub fn shuffle_answers<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        fisher_yates(&mut self.answers, rng);
    }
}
