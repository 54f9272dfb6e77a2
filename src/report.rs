use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;
use trialseq_experiment::TrialSequence;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line per trial
    Text,
    /// Full sequence including questions and answers
    Json,
}

pub fn write_sequence<W: Write>(seq: &TrialSequence, format: Format, mut out: W) -> Result<()> {
    match format {
        Format::Text => {
            let config = seq.config();
            writeln!(out, "Preset: {}", config.preset)?;
            writeln!(
                out,
                "Trials: {} ({} practice, {} main, {} rest breaks)",
                seq.total_trials(),
                config.layout.practice_trials,
                config.layout.main_trials,
                config.layout.rest_breaks(),
            )?;
            writeln!(out, "Data frequency: {:.2} s", seq.data_frequency())?;
            for warning in seq.warnings() {
                writeln!(out, "Warning: {warning}")?;
            }
            writeln!(out, "--------")?;
            out.write_all(seq.describe().as_bytes())?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, seq)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
