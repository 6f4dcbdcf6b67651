use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::io::DEFAULT_PPQ;
use crate::sonify::{IndexPolicies, IndexPolicy, Voice};

const DEFAULT_TRACKS: usize = 4;

/// Recording settings, stored as RON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonifyConfig {
    /// Where the MIDI file is written
    pub output: PathBuf,
    pub bpm: u32,
    /// Ticks per quarter note in the written file
    pub ppq: u16,
    /// Blocking window of each utilization read
    pub sample_interval_ms: u64,
    /// Cadence of the recording loop
    pub tick_interval_ms: u64,
    /// Persist the file every this many ticks
    pub save_every: u64,
    /// Stop after this many ticks (None = run until interrupted)
    pub ticks: Option<u64>,
    /// Lay each tick's notes out after the previous tick instead of at beat 0
    pub sequential: bool,
    pub core_policy: IndexPolicy,
    pub track_policy: IndexPolicy,
    /// Track names; the document gets one track per entry
    pub tracks: Vec<String>,
    pub voices: Vec<Voice>,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("cpu_usage.mid"),
            bpm: 120,
            ppq: DEFAULT_PPQ,
            sample_interval_ms: 100,
            tick_interval_ms: 1000,
            save_every: 10,
            ticks: None,
            sequential: false,
            core_policy: IndexPolicy::default(),
            track_policy: IndexPolicy::default(),
            tracks: (0..DEFAULT_TRACKS).map(|i| format!("CPU {}", i)).collect(),
            voices: (0..DEFAULT_TRACKS).map(Voice::per_core).collect(),
        }
    }
}

impl SonifyConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: SonifyConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracks.is_empty() {
            return Err(ConfigError::Invalid("at least one track is required".into()));
        }
        if self.bpm == 0 {
            return Err(ConfigError::Invalid("bpm must be positive".into()));
        }
        if self.ppq == 0 || self.ppq > 0x7FFF {
            return Err(ConfigError::Invalid(format!(
                "ppq must be in 1..=32767, got {}",
                self.ppq
            )));
        }
        if self.save_every == 0 {
            return Err(ConfigError::Invalid("save_every must be positive".into()));
        }
        Ok(())
    }

    pub fn policies(&self) -> IndexPolicies {
        IndexPolicies {
            core: self.core_policy,
            track: self.track_policy,
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Beats covered by one tick of the loop at the configured tempo
    pub fn beats_per_tick(&self) -> f64 {
        self.tick_interval().as_secs_f64() * self.bpm as f64 / 60.0
    }
}
