// Purpose - utilization readings from the OS, behind a swappable source

mod scripted;
mod system;

use std::time::Duration;

use crate::error::SamplerError;

pub use scripted::ScriptedSampler;
pub use system::SystemSampler;

/// A source of CPU utilization percentages (0-100).
///
/// `per_core` asks for one reading per logical core; otherwise a single
/// aggregate reading is returned. Implementations may block for `interval`.
pub trait CpuSampler {
    fn cpu_percent(&mut self, interval: Duration, per_core: bool)
        -> Result<Vec<f32>, SamplerError>;
}

impl<S: CpuSampler + ?Sized> CpuSampler for &mut S {
    fn cpu_percent(
        &mut self,
        interval: Duration,
        per_core: bool,
    ) -> Result<Vec<f32>, SamplerError> {
        (**self).cpu_percent(interval, per_core)
    }
}
