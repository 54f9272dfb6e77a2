use serde::Serialize;
use thiserror::Error;

/// Non-fatal anomalies found while building a sequence.
///
/// None of these stop construction. Each one is logged when it is raised
/// and kept on the finished sequence so callers can decide what to do.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequenceWarning {
    #[error(
        "rest breaks not allocated properly: a break every {rest_frequency} slots cannot fit around blocks of {block_length} trials"
    )]
    RestBreakSpacing {
        rest_frequency: usize,
        block_length: usize,
    },

    #[error("only {pool} unique questions to fill a block of {block_length} trials, trials will repeat")]
    InsufficientPool { pool: usize, block_length: usize },

    #[error("only {pool} practice questions for {practice_trials} practice trials")]
    InsufficientPracticePool { pool: usize, practice_trials: usize },

    #[error("{count} rest breaks did not fall between blocks and were appended before exit")]
    UnplacedRestBreaks { count: usize },

    #[error("trial {index} was never written, using a rest break")]
    UnwrittenSlot { index: usize },
}

impl SequenceWarning {
    /// Warnings caused by the layout itself rather than by the question bank
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::RestBreakSpacing { .. } | Self::UnplacedRestBreaks { .. }
        )
    }
}
