use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use trialseq_core::{Answer, Question, QuestionError, RandomSource};

const BUILTIN_BANK: &str = include_str!("../data/questions.json");

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question bank: {0}")]
    Json(#[from] serde_json::Error),

    #[error("correct answer {correct} out of range for {options} options in {prompt:?}")]
    CorrectOutOfRange {
        prompt: String,
        correct: usize,
        options: usize,
    },

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// A question as written in the bank file
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    pub prompt: String,
    pub answers: Vec<String>,
    /// Index into `answers`
    pub correct: usize,
    #[serde(default)]
    pub stimulus: Option<String>,
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, BankError> {
        if self.correct >= self.answers.len() {
            return Err(BankError::CorrectOutOfRange {
                options: self.answers.len(),
                correct: self.correct,
                prompt: self.prompt,
            });
        }
        let answers = self
            .answers
            .into_iter()
            .enumerate()
            .map(|(i, text)| Answer::new(text, i == self.correct))
            .collect();
        Ok(Question::new(self.prompt, answers, self.stimulus)?)
    }
}

#[derive(Deserialize)]
struct BankFile {
    #[serde(default)]
    practice: Vec<QuestionRecord>,
    #[serde(default)]
    main: Vec<QuestionRecord>,
}

/// Practice questions (used in order) and the main pool (shuffled per block)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    practice: Vec<Question>,
    main: Vec<Question>,
}

impl QuestionBank {
    pub fn new(practice: Vec<Question>, main: Vec<Question>) -> Self {
        Self { practice, main }
    }

    /// The question set bundled with the crate.
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_json_str(BUILTIN_BANK)
    }

    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(json)?;
        let practice = file
            .practice
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<_, _>>()?;
        let main = file
            .main
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<_, _>>()?;
        Ok(Self { practice, main })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn practice(&self) -> &[Question] {
        &self.practice
    }

    pub fn main(&self) -> &[Question] {
        &self.main
    }

    /// Randomises answer placement on every question, once, before the
    /// questions are handed to a builder.
    pub fn shuffle_answers<R: RandomSource + ?Sized>(mut self, rng: &mut R) -> Self {
        for question in self.practice.iter_mut().chain(self.main.iter_mut()) {
            question.shuffle_answers(rng);
        }
        self
    }

    pub(crate) fn into_shared(self) -> (Vec<Arc<Question>>, Vec<Arc<Question>>) {
        (
            self.practice.into_iter().map(Arc::new).collect(),
            self.main.into_iter().map(Arc::new).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn builtin_bank_loads() {
        let bank = QuestionBank::builtin().unwrap();
        assert_eq!(bank.practice().len(), 2);
        assert_eq!(bank.main().len(), 30);
        for q in bank.practice().iter().chain(bank.main()) {
            assert_eq!(q.answers().len(), 2);
            assert_eq!(q.answers().iter().filter(|a| a.is_correct).count(), 1);
        }
        assert_eq!(bank.practice()[0].correct_answer(), "yes");
        // prompts are kept byte for byte, trailing whitespace included
        let food = bank.main().iter().find(|q| q.prompt().contains("food items"));
        assert!(food.unwrap().prompt().ends_with("preferred to eat. "));
    }

    #[test]
    fn records_map_correct_index() {
        let bank = QuestionBank::from_json_str(
            r#"{ "main": [ { "prompt": "p", "answers": ["a", "b", "c"], "correct": 2, "stimulus": "cup.png" } ] }"#,
        )
        .unwrap();
        assert!(bank.practice().is_empty());
        let q = &bank.main()[0];
        assert_eq!(q.correct_answer(), "c");
        assert_eq!(q.stimulus(), Some("cup.png"));
    }

    #[test]
    fn correct_index_out_of_range() {
        let err = QuestionBank::from_json_str(
            r#"{ "practice": [ { "prompt": "p", "answers": ["a"], "correct": 1 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BankError::CorrectOutOfRange {
                correct: 1,
                options: 1,
                ..
            }
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            QuestionBank::from_json_str("{ \"main\": 3 }"),
            Err(BankError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = QuestionBank::load("/nonexistent/questions.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/questions.json"));
    }

    #[test]
    fn shuffled_answers_keep_prompts_and_correctness() {
        let bank = QuestionBank::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let shuffled = bank.clone().shuffle_answers(&mut rng);
        for (before, after) in bank.main().iter().zip(shuffled.main()) {
            assert_eq!(before.prompt(), after.prompt());
            assert_eq!(before.correct_answer(), after.correct_answer());
        }
    }
}
