use crate::warning::SequenceWarning;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use trialseq_core::RandomSource;

/// Persistent, information, before-starting, consent, start and instruction screens.
pub const SETUP_SLOTS: usize = 6;
/// Setup screens plus the final exit screen.
pub const SETUP_AND_CLOSE_SLOTS: usize = SETUP_SLOTS + 1;
/// The get-ready screen that closes the practice block.
pub const GET_READY_SLOTS: usize = 1;
/// A rest break occupies one slot of its own.
pub const REST_BREAK_OFFSET: usize = 1;
/// Sampling period for participant and state data.
pub const DATA_RECORD_FREQUENCY_SECS: f32 = 0.06;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown experiment preset {0:?}")]
    UnknownPreset(String),

    #[error("rest frequency must be at least one slot")]
    ZeroRestFrequency,

    #[error("block length must be non-zero for {main_trials} main trials")]
    ZeroBlockLength { main_trials: usize },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Named experiment versions
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Full question-answering run
    #[default]
    MturkPilot,
    /// Single block lab pilot
    SingleblockLabpilot,
    /// Tiny sequence for debugging
    MicroDebug,
}

impl Preset {
    pub const ALL: [Preset; 3] = [
        Preset::MturkPilot,
        Preset::SingleblockLabpilot,
        Preset::MicroDebug,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MturkPilot => "mturk_pilot",
            Self::SingleblockLabpilot => "singleblock_labpilot",
            Self::MicroDebug => "micro_debug",
        }
    }

    pub fn layout(&self) -> SequenceLayout {
        match self {
            Self::MturkPilot => SequenceLayout {
                practice_trials: 2,
                main_trials: 30,
                rest_frequency: 31 + REST_BREAK_OFFSET,
                block_length: 30,
            },
            Self::SingleblockLabpilot => SequenceLayout {
                practice_trials: 1,
                main_trials: 16,
                rest_frequency: 20 + REST_BREAK_OFFSET,
                block_length: 16,
            },
            Self::MicroDebug => SequenceLayout {
                practice_trials: 2,
                main_trials: 3,
                rest_frequency: 5 + REST_BREAK_OFFSET,
                block_length: 3,
            },
        }
    }

    pub fn rest_break_ms(&self) -> u64 {
        match self {
            Self::MturkPilot => 30_000,
            Self::SingleblockLabpilot | Self::MicroDebug => 5_000,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Slot counts that fix the shape of a sequence.
///
/// `rest_frequency` counts slots, so it already includes the rest break
/// itself: a break every 5 trials is written as `5 + REST_BREAK_OFFSET`.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceLayout {
    pub practice_trials: usize,
    pub main_trials: usize,
    pub rest_frequency: usize,
    pub block_length: usize,
}

impl SequenceLayout {
    /// Practice questions plus the get-ready screen after them
    pub fn practice_slots(&self) -> usize {
        self.practice_trials + GET_READY_SLOTS
    }

    pub fn rest_breaks(&self) -> usize {
        if self.rest_frequency == 0 {
            return 0;
        }
        self.main_trials / self.rest_frequency
    }

    pub fn total_trials(&self) -> usize {
        self.main_trials + SETUP_AND_CLOSE_SLOTS + self.practice_slots() + self.rest_breaks()
    }

    pub fn get_ready_index(&self) -> usize {
        SETUP_SLOTS + self.practice_slots() - 1
    }

    /// First slot of the main phase
    pub fn main_start(&self) -> usize {
        self.get_ready_index() + 1
    }

    pub fn exit_index(&self) -> usize {
        self.total_trials() - 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rest_frequency == 0 {
            return Err(ConfigError::ZeroRestFrequency);
        }
        if self.block_length == 0 && self.main_trials > 0 {
            return Err(ConfigError::ZeroBlockLength {
                main_trials: self.main_trials,
            });
        }
        Ok(())
    }

    /// Set when a block is longer than the run of trials allowed between breaks.
    pub fn spacing_warning(&self) -> Option<SequenceWarning> {
        (self.rest_frequency.saturating_sub(REST_BREAK_OFFSET) < self.block_length).then_some(
            SequenceWarning::RestBreakSpacing {
                rest_frequency: self.rest_frequency,
                block_length: self.block_length,
            },
        )
    }
}

/// Presentation timings in milliseconds. Jittered values are minimums.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentTimings {
    pub max_response_ms: u64,
    pub pre_display_cue_ms: u64,
    pub display_cue_ms: u64,
    /// Minimum reading time before a response is accepted
    pub go_cue_delay_ms: u64,
    pub final_goal_hit_pause_ms: u64,
    pub display_message_ms: u64,
    /// Should be at least `display_message_ms`
    pub error_dwell_ms: u64,
    pub rest_break_ms: u64,
    pub get_ready_ms: u64,
    pub pause_prior_feedback_ms: u64,
    pub feedback_flash_ms: u64,
}

impl Default for ExperimentTimings {
    fn default() -> Self {
        Self {
            max_response_ms: 90_000,
            pre_display_cue_ms: 1_000,
            display_cue_ms: 0,
            go_cue_delay_ms: 100,
            final_goal_hit_pause_ms: 200,
            display_message_ms: 1_500,
            error_dwell_ms: 1_500,
            rest_break_ms: Preset::default().rest_break_ms(),
            get_ready_ms: 5_000,
            pause_prior_feedback_ms: 0,
            feedback_flash_ms: 200,
        }
    }
}

impl ExperimentTimings {
    pub fn for_preset(preset: Preset) -> Self {
        Self {
            rest_break_ms: preset.rest_break_ms(),
            ..Self::default()
        }
    }
}

/// Timing fields set in a config file. Anything left out keeps the preset value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingOverrides {
    max_response_ms: Option<u64>,
    pre_display_cue_ms: Option<u64>,
    display_cue_ms: Option<u64>,
    go_cue_delay_ms: Option<u64>,
    final_goal_hit_pause_ms: Option<u64>,
    display_message_ms: Option<u64>,
    error_dwell_ms: Option<u64>,
    rest_break_ms: Option<u64>,
    get_ready_ms: Option<u64>,
    pause_prior_feedback_ms: Option<u64>,
    feedback_flash_ms: Option<u64>,
}

impl TimingOverrides {
    fn apply(self, timings: &mut ExperimentTimings) {
        let fields = [
            (self.max_response_ms, &mut timings.max_response_ms),
            (self.pre_display_cue_ms, &mut timings.pre_display_cue_ms),
            (self.display_cue_ms, &mut timings.display_cue_ms),
            (self.go_cue_delay_ms, &mut timings.go_cue_delay_ms),
            (self.final_goal_hit_pause_ms, &mut timings.final_goal_hit_pause_ms),
            (self.display_message_ms, &mut timings.display_message_ms),
            (self.error_dwell_ms, &mut timings.error_dwell_ms),
            (self.rest_break_ms, &mut timings.rest_break_ms),
            (self.get_ready_ms, &mut timings.get_ready_ms),
            (self.pause_prior_feedback_ms, &mut timings.pause_prior_feedback_ms),
            (self.feedback_flash_ms, &mut timings.feedback_flash_ms),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

/// Uniform jitter from `base_ms` up to 50% above it.
pub fn jitter_ms<R: RandomSource + ?Sized>(base_ms: u64, rng: &mut R) -> u64 {
    base_ms + (0.5 * base_ms as f32 * rng.next_float()) as u64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentConfig {
    pub preset: Preset,
    pub layout: SequenceLayout,
    pub timings: ExperimentTimings,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

/// On-disk form: a preset with optional overrides.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    preset: Preset,
    layout: Option<SequenceLayout>,
    timings: Option<TimingOverrides>,
}

impl ExperimentConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            layout: preset.layout(),
            timings: ExperimentTimings::for_preset(preset),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let mut config = Self::from_preset(file.preset);
        if let Some(layout) = file.layout {
            config.layout = layout;
        }
        if let Some(overrides) = file.timings {
            overrides.apply(&mut config.timings);
        }
        config.layout.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!(matches!(
            "full_experiment".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(name)) if name == "full_experiment"
        ));
    }

    #[test]
    fn preset_layouts_are_consistent() {
        for preset in Preset::ALL {
            let layout = preset.layout();
            layout.validate().unwrap();
            assert!(layout.spacing_warning().is_none(), "{preset}");
            assert_eq!(layout.rest_breaks(), 0);
        }
    }

    #[test]
    fn mturk_pilot_shape() {
        let layout = Preset::MturkPilot.layout();
        assert_eq!(layout.practice_slots(), 3);
        assert_eq!(layout.total_trials(), 30 + 7 + 3);
        assert_eq!(layout.get_ready_index(), 8);
        assert_eq!(layout.main_start(), 9);
        assert_eq!(layout.exit_index(), 39);
    }

    #[test]
    fn rest_breaks_round_down() {
        let layout = SequenceLayout {
            practice_trials: 1,
            main_trials: 25,
            rest_frequency: 6,
            block_length: 5,
        };
        assert_eq!(layout.rest_breaks(), 4);
        assert_eq!(layout.total_trials(), 25 + 7 + 2 + 4);
        assert!(layout.spacing_warning().is_none());
    }

    #[test]
    fn spacing_warning_when_block_outruns_breaks() {
        let layout = SequenceLayout {
            practice_trials: 0,
            main_trials: 30,
            rest_frequency: 6,
            block_length: 30,
        };
        assert_eq!(
            layout.spacing_warning(),
            Some(SequenceWarning::RestBreakSpacing {
                rest_frequency: 6,
                block_length: 30
            })
        );
    }

    #[test]
    fn validation_rejects_zero_sizes() {
        let mut layout = Preset::MicroDebug.layout();
        layout.rest_frequency = 0;
        assert!(matches!(layout.validate(), Err(ConfigError::ZeroRestFrequency)));

        let mut layout = Preset::MicroDebug.layout();
        layout.block_length = 0;
        assert!(matches!(
            layout.validate(),
            Err(ConfigError::ZeroBlockLength { main_trials: 3 })
        ));
    }

    #[test]
    fn json_config_overrides_preset() {
        let config = ExperimentConfig::from_json_str(
            r#"{
                "preset": "micro_debug",
                "layout": { "practice_trials": 0, "main_trials": 12, "rest_frequency": 5, "block_length": 4 },
                "timings": { "max_response_ms": 10000 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.preset, Preset::MicroDebug);
        assert_eq!(config.layout.main_trials, 12);
        assert_eq!(config.timings.max_response_ms, 10_000);
        assert_eq!(config.timings.get_ready_ms, 5_000);
        assert_eq!(config.timings.rest_break_ms, 5_000);

        let preset_only = ExperimentConfig::from_json_str(r#"{ "preset": "singleblock_labpilot" }"#)
            .unwrap();
        assert_eq!(preset_only, ExperimentConfig::from_preset(Preset::SingleblockLabpilot));
        assert_eq!(preset_only.timings.rest_break_ms, 5_000);
    }

    #[test]
    fn partial_timings_keep_preset_values() {
        let config = ExperimentConfig::from_json_str(
            r#"{ "preset": "micro_debug", "timings": { "max_response_ms": 10000 } }"#,
        )
        .unwrap();
        let expected = ExperimentTimings {
            max_response_ms: 10_000,
            ..ExperimentTimings::for_preset(Preset::MicroDebug)
        };
        assert_eq!(config.timings, expected);
        assert_eq!(config.timings.rest_break_ms, 5_000);

        let config = ExperimentConfig::from_json_str(
            r#"{ "preset": "mturk_pilot", "timings": { "rest_break_ms": 12000 } }"#,
        )
        .unwrap();
        assert_eq!(config.timings.rest_break_ms, 12_000);
        assert_eq!(config.timings.max_response_ms, 90_000);
    }

    #[test]
    fn unknown_timing_fields_are_rejected() {
        let err = ExperimentConfig::from_json_str(
            r#"{ "preset": "micro_debug", "timings": { "rest_break": 1000 } }"#,
        );
        assert!(matches!(err, Err(ConfigError::Json(_))));
    }

    #[test]
    fn json_config_is_validated() {
        let err = ExperimentConfig::from_json_str(
            r#"{ "layout": { "practice_trials": 0, "main_trials": 3, "rest_frequency": 0, "block_length": 3 } }"#,
        );
        assert!(matches!(err, Err(ConfigError::ZeroRestFrequency)));
        assert!(matches!(
            ExperimentConfig::from_json_str(r#"{ "preset": "nope" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn jitter_stays_within_half_again() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let t = jitter_ms(1_000, &mut rng);
            assert!((1_000..=1_500).contains(&t));
        }
        assert_eq!(jitter_ms(0, &mut rng), 0);
    }
}
