use crate::bank::QuestionBank;
use crate::config::{ExperimentConfig, SETUP_SLOTS, SequenceLayout};
use crate::sequence::TrialSequence;
use crate::warning::SequenceWarning;
use log::{debug, info, warn};
use std::sync::Arc;
use trialseq_core::{MazeTag, Question, RandomSource, Trial, fisher_yates};

/// Lays out a complete trial sequence in one pass.
///
/// Slot order: six setup screens, practice trials in bank order, the
/// get-ready screen, shuffled main blocks with rest breaks between them,
/// and the exit screen. Problems along the way are recorded as
/// [`SequenceWarning`]s and never abort the build.
pub struct SequenceBuilder<R: RandomSource> {
    config: ExperimentConfig,
    practice: Vec<Arc<Question>>,
    pool: Vec<Arc<Question>>,
    rng: R,
    slots: Vec<Option<Trial>>,
    warnings: Vec<SequenceWarning>,
}

impl<R: RandomSource> SequenceBuilder<R> {
    pub fn new(config: ExperimentConfig, bank: QuestionBank, rng: R) -> Self {
        let (practice, pool) = bank.into_shared();
        let total = config.layout.total_trials();
        Self {
            config,
            practice,
            pool,
            rng,
            slots: vec![None; total],
            warnings: Vec::new(),
        }
    }

    pub fn build(mut self) -> TrialSequence {
        let layout = self.config.layout;
        info!(
            "Building {} sequence: {} slots ({} practice, {} main, {} rest breaks)",
            self.config.preset,
            layout.total_trials(),
            layout.practice_trials,
            layout.main_trials,
            layout.rest_breaks(),
        );

        if let Some(w) = layout.spacing_warning() {
            self.warn(w);
        }

        self.add_setup_and_close(&layout);
        self.add_practice_trials(&layout);
        self.add_main_trials(&layout);

        let mut unwritten = Vec::new();
        let trials: Vec<Trial> = std::mem::take(&mut self.slots)
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    unwritten.push(index);
                    Trial::rest_break()
                })
            })
            .collect();
        for index in unwritten {
            self.warn(SequenceWarning::UnwrittenSlot { index });
        }

        let sequence = TrialSequence::new(self.config, trials, self.warnings);
        debug!("Trial sequence:\n{}", sequence.describe());
        sequence
    }

    fn warn(&mut self, warning: SequenceWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    fn write(&mut self, index: usize, trial: Trial) {
        debug_assert!(index < self.slots.len(), "slot {index} outside sequence");
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(trial);
        }
    }

    fn add_setup_and_close(&mut self, layout: &SequenceLayout) {
        for (index, tag) in MazeTag::SETUP.into_iter().enumerate() {
            self.write(index, Trial::administrative(tag));
        }
        self.write(
            layout.get_ready_index(),
            Trial::administrative(MazeTag::GetReady),
        );
        self.write(layout.exit_index(), Trial::administrative(MazeTag::Exit));
    }

    /// Practice questions go out in bank order, never shuffled.
    fn add_practice_trials(&mut self, layout: &SequenceLayout) {
        let count = layout.practice_trials;
        let available = self.practice.len();
        if available < count {
            self.warn(SequenceWarning::InsufficientPracticePool {
                pool: available,
                practice_trials: count,
            });
        }
        if available == 0 {
            return;
        }
        for offset in 0..count {
            let question = Arc::clone(&self.practice[offset % available]);
            self.write(SETUP_SLOTS + offset, Trial::practice(question));
        }
    }

    /// Main trials in blocks, with a rest break before any block that would
    /// run past the allowed number of trials since the last break.
    fn add_main_trials(&mut self, layout: &SequenceLayout) {
        let max_run = layout.rest_frequency.saturating_sub(1);
        let mut next = layout.main_start();
        let mut remaining = layout.main_trials;
        let mut breaks_left = layout.rest_breaks();
        let mut since_break = 0;

        while remaining > 0 {
            let len = remaining.min(layout.block_length.max(1));
            if since_break > 0 && breaks_left > 0 && since_break + len > max_run {
                next = self.rest_break_here(next);
                breaks_left -= 1;
                since_break = 0;
            }
            next = self.shuffle_and_store_block(next, len);
            remaining -= len;
            since_break += len;
        }

        if breaks_left > 0 {
            self.warn(SequenceWarning::UnplacedRestBreaks { count: breaks_left });
            for _ in 0..breaks_left {
                next = self.rest_break_here(next);
            }
        }
        debug_assert_eq!(next, layout.exit_index());
    }

    fn rest_break_here(&mut self, index: usize) -> usize {
        self.write(index, Trial::rest_break());
        index + 1
    }

    /// Shuffles the whole pool, then writes `block_length` main trials from
    /// `start`. Positions past the pool size draw a random pool question each,
    /// so they can repeat earlier entries. Returns the next free slot.
    fn shuffle_and_store_block(&mut self, start: usize, block_length: usize) -> usize {
        let n = self.pool.len();
        if n < block_length {
            self.warn(SequenceWarning::InsufficientPool {
                pool: n,
                block_length,
            });
        }
        if n == 0 {
            return start + block_length;
        }

        fisher_yates(&mut self.pool, &mut self.rng);

        for i in 0..block_length {
            let pick = if i < n { i } else { self.rng.next_int(n) };
            let question = Arc::clone(&self.pool[pick]);
            self.write(start + i, Trial::main(question));
        }

        start + block_length
    }
}
