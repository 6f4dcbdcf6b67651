use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use cpu_sonify::sonify::IndexPolicy;
use cpu_sonify::SonifyConfig;

#[derive(Parser)]
#[command(name = "cpu-sonify")]
#[command(about = "Record per-core CPU utilization as MIDI notes")]
#[command(version)]
pub struct Cli {
    /// RON config file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output MIDI file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after this many ticks (default: run until interrupted)
    #[arg(short = 'n', long)]
    pub ticks: Option<u64>,

    /// Tempo written to every track
    #[arg(long)]
    pub bpm: Option<u32>,

    /// Milliseconds between ticks
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Place each tick's notes after the previous tick's instead of at beat 0
    #[arg(long)]
    pub sequential: bool,

    /// Out-of-range core index handling
    #[arg(long, value_enum)]
    pub core_policy: Option<PolicyArg>,

    /// Out-of-range track index handling
    #[arg(long, value_enum)]
    pub track_policy: Option<PolicyArg>,

    /// Write the effective config to this file and exit
    #[arg(long)]
    pub write_config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Zero,
    Last,
    Reject,
}

impl From<PolicyArg> for IndexPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Zero => IndexPolicy::ClampToZero,
            PolicyArg::Last => IndexPolicy::ClampToLast,
            PolicyArg::Reject => IndexPolicy::Reject,
        }
    }
}

impl Cli {
    /// Layer flags over a loaded (or default) config
    pub fn apply(&self, config: &mut SonifyConfig) {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(ticks) = self.ticks {
            config.ticks = Some(ticks);
        }
        if let Some(bpm) = self.bpm {
            config.bpm = bpm;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.tick_interval_ms = interval_ms;
        }
        if self.sequential {
            config.sequential = true;
        }
        if let Some(policy) = self.core_policy {
            config.core_policy = policy.into();
        }
        if let Some(policy) = self.track_policy {
            config.track_policy = policy.into();
        }
    }
}
