use std::fmt;
use std::path::PathBuf;

/// Failures reading utilization from the operating system
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("CPU usage sampling is not supported on this platform")]
    Unsupported,

    #[error("The system reported no CPU cores")]
    NoCores,
}

/// Failures building or persisting a MIDI document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Track {track} does not exist (document has {tracks} tracks)")]
    NoSuchTrack { track: usize, tracks: usize },

    #[error("Time {beats} beats is outside the range a MIDI file can hold")]
    TimeOutOfRange { beats: f64 },

    #[error("Failed to write MIDI file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures loading, saving or validating a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Which reading a core index feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreRole {
    Pitch,
    Duration,
}

impl fmt::Display for CoreRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreRole::Pitch => write!(f, "pitch"),
            CoreRole::Duration => write!(f, "duration"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SonifyError {
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("The utilization sample was empty")]
    EmptySample,

    #[error("{role} core index {index} out of range ({cores} cores)")]
    CoreIndexOutOfRange {
        role: CoreRole,
        index: usize,
        cores: usize,
    },

    #[error("Track index {index} out of range ({tracks} tracks)")]
    TrackIndexOutOfRange { index: usize, tracks: usize },
}
