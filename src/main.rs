use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use trialseq_experiment::{ExperimentConfig, Preset, QuestionBank, SequenceBuilder};

mod report;
use report::Format;

/// Build the trial sequence for a question-answering experiment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Experiment preset
    #[arg(short, long, default_value_t = Preset::default())]
    preset: Preset,

    /// JSON config file (a preset plus optional layout/timing overrides)
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// JSON question bank, defaults to the bundled questions
    #[arg(short, long)]
    bank: Option<PathBuf>,

    /// Seed for a reproducible sequence
    #[arg(short, long)]
    seed: Option<u64>,

    /// Keep answer options in bank order
    #[arg(long)]
    fixed_answer_order: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    info!(
        "Platform: {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    let config = match &cli.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExperimentConfig::from_preset(cli.preset),
    };

    let bank = match &cli.bank {
        Some(path) => QuestionBank::load(path)?,
        None => QuestionBank::builtin().context("loading bundled question bank")?,
    };

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!("Seed: {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let bank = if cli.fixed_answer_order {
        bank
    } else {
        bank.shuffle_answers(&mut rng)
    };

    let sequence = SequenceBuilder::new(config, bank, rng).build();
    if !sequence.warnings().is_empty() {
        warn!(
            "Sequence built with {} warning(s)",
            sequence.warnings().len()
        );
    }

    match &cli.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            report::write_sequence(&sequence, cli.format, BufWriter::new(file))?;
            info!("Sequence saved to {}", path.display());
        }
        None => report::write_sequence(&sequence, cli.format, io::stdout().lock())?,
    }

    Ok(())
}
