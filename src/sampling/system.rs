use std::thread;
use std::time::Duration;

use sysinfo::System;

use super::CpuSampler;
use crate::error::SamplerError;

/// Reads live utilization through `sysinfo`.
///
/// Usage is a delta between two refreshes, so every call blocks for at least
/// `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    pub fn new() -> Result<Self, SamplerError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SamplerError::Unsupported);
        }
        let mut system = System::new();
        system.refresh_cpu_usage();
        Ok(Self { system })
    }

    /// Number of logical cores the OS reports
    pub fn core_count(&self) -> usize {
        self.system.cpus().len()
    }
}

impl CpuSampler for SystemSampler {
    fn cpu_percent(
        &mut self,
        interval: Duration,
        per_core: bool,
    ) -> Result<Vec<f32>, SamplerError> {
        self.system.refresh_cpu_usage();
        thread::sleep(interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu_usage();

        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return Err(SamplerError::NoCores);
        }

        if per_core {
            Ok(cpus.iter().map(|cpu| cpu.cpu_usage()).collect())
        } else {
            Ok(vec![self.system.global_cpu_usage()])
        }
    }
}
