pub mod config;
pub mod error;
pub mod io; // MIDI document and SMF encoding
pub mod recorder; // Sampling loop and periodic persistence
pub mod sampling; // CPU utilization sources
pub mod sonify; // Utilization to note mapping

pub use config::SonifyConfig;
pub use error::SonifyError;
pub use recorder::Recorder;
