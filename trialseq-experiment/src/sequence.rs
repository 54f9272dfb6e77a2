use crate::config::{DATA_RECORD_FREQUENCY_SECS, ExperimentConfig};
use crate::warning::SequenceWarning;
use serde::Serialize;
use std::fmt::Write as _;
use trialseq_core::{MazeTag, Question, Trial};

/// A fully built, read-only trial sequence.
///
/// Index accessors return `None` (or an empty list) for indices past the end
/// and for trials that carry no question.
#[derive(Debug, Clone, Serialize)]
pub struct TrialSequence {
    config: ExperimentConfig,
    trials: Vec<Trial>,
    warnings: Vec<SequenceWarning>,
}

impl TrialSequence {
    pub(crate) fn new(
        config: ExperimentConfig,
        trials: Vec<Trial>,
        warnings: Vec<SequenceWarning>,
    ) -> Self {
        Self {
            config,
            trials,
            warnings,
        }
    }

    pub fn total_trials(&self) -> usize {
        self.trials.len()
    }

    /// Sampling period in seconds for recorded data
    pub fn data_frequency(&self) -> f32 {
        DATA_RECORD_FREQUENCY_SECS
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn warnings(&self) -> &[SequenceWarning] {
        &self.warnings
    }

    pub fn trial(&self, index: usize) -> Option<&Trial> {
        self.trials.get(index)
    }

    pub fn trial_maze(&self, index: usize) -> Option<MazeTag> {
        self.trial(index).map(|t| t.maze)
    }

    fn question_at(&self, index: usize) -> Option<&Question> {
        self.trial(index).and_then(Trial::question)
    }

    pub fn question(&self, index: usize) -> Option<&str> {
        self.question_at(index).map(Question::prompt)
    }

    pub fn possible_answers(&self, index: usize) -> Vec<&str> {
        self.question_at(index)
            .map(Question::answer_texts)
            .unwrap_or_default()
    }

    /// Text of the answer flagged correct
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.question_at(index).map(Question::correct_answer)
    }

    pub fn stimulus(&self, index: usize) -> Option<&str> {
        self.question_at(index).and_then(Question::stimulus)
    }

    /// One readable line per trial, for checking a generated sequence by eye.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (index, trial) in self.trials.iter().enumerate() {
            let _ = write!(out, "Trial {index}, Maze: {}", trial.maze);
            if let Some(q) = trial.question() {
                let _ = write!(out, ", Question: {}", q.prompt().lines().next().unwrap_or(""));
            }
            out.push('\n');
        }
        out
    }
}
