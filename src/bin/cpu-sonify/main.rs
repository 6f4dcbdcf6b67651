//! cpu-sonify - record CPU utilization as a MIDI file
//!
//! Run with: cargo run -- --ticks 60 --output cpu.mid

mod cli;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use cli::Cli;
use cpu_sonify::sampling::SystemSampler;
use cpu_sonify::{Recorder, SonifyConfig};

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SonifyConfig::load(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => SonifyConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .wrap_err_with(|| format!("failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "config written");
        return Ok(());
    }

    let sampler = SystemSampler::new().wrap_err("failed to open CPU sampler")?;
    let cores = sampler.core_count();
    let mut recorder = Recorder::new(config, sampler)?;

    let config = recorder.config();
    tracing::info!(
        cores,
        voices = config.voices.len(),
        tracks = config.tracks.len(),
        bpm = config.bpm,
        output = %config.output.display(),
        "recording"
    );
    recorder.run().wrap_err("recording failed")?;

    Ok(())
}
