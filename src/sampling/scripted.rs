use std::time::Duration;

use super::CpuSampler;
use crate::error::SamplerError;

/// Replays fixed per-core frames in a cycle, without blocking
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    frames: Vec<Vec<f32>>,
    position: usize,
    calls: usize,
}

impl ScriptedSampler {
    pub fn new(frames: Vec<Vec<f32>>) -> Self {
        Self {
            frames,
            position: 0,
            calls: 0,
        }
    }

    /// Every call returns the same frame
    pub fn constant(frame: Vec<f32>) -> Self {
        Self::new(vec![frame])
    }

    /// `cores` cores all reporting `percent`
    pub fn uniform(percent: f32, cores: usize) -> Self {
        Self::constant(vec![percent; cores])
    }

    /// How many times the sampler has been read
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl CpuSampler for ScriptedSampler {
    fn cpu_percent(
        &mut self,
        _interval: Duration,
        per_core: bool,
    ) -> Result<Vec<f32>, SamplerError> {
        if self.frames.is_empty() {
            return Err(SamplerError::NoCores);
        }
        let frame = &self.frames[self.position];
        self.position = (self.position + 1) % self.frames.len();
        self.calls += 1;

        if per_core {
            Ok(frame.clone())
        } else if frame.is_empty() {
            Err(SamplerError::NoCores)
        } else {
            let mean = frame.iter().sum::<f32>() / frame.len() as f32;
            Ok(vec![mean])
        }
    }
}
