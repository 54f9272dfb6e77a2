pub mod bank;
pub mod builder;
pub mod config;
pub mod sequence;
pub mod warning;
pub use bank::{BankError, QuestionBank, QuestionRecord};
pub use builder::SequenceBuilder;
pub use config::{
    ConfigError, DATA_RECORD_FREQUENCY_SECS, ExperimentConfig, ExperimentTimings, Preset,
    SequenceLayout, jitter_ms,
};
pub use sequence::TrialSequence;
pub use warning::SequenceWarning;
