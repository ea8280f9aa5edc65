//! Runtime configuration types for the sampler.
//!
//! These are the structs consumed by `InsoleSampler` and the runner.
//! They are separate from the TOML-deserialized config in `insole_config`.

use std::time::Duration;

use insole_traits::Attenuation;

/// One-time converter setup applied before the first read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcSetup {
    pub resolution_bits: u8,
    pub attenuation: Attenuation,
}

impl Default for AdcSetup {
    fn default() -> Self {
        Self {
            resolution_bits: 12,
            attenuation: Attenuation::Db11,
        }
    }
}

/// Oversampling applied to every channel read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionCfg {
    /// Reads averaged into one sample (>= 1).
    pub samples: u32,
    /// Settling pause after each read.
    pub settle: Duration,
}

impl Default for AcquisitionCfg {
    fn default() -> Self {
        Self {
            samples: 10,
            settle: Duration::from_micros(100),
        }
    }
}

/// Tunables shared by every channel's Kalman filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanCfg {
    /// Q: variance added to the error covariance at every prediction.
    pub process_noise: f32,
    /// R: variance attributed to each calibrated measurement.
    pub measurement_noise: f32,
    pub initial_estimate: f32,
    pub initial_covariance: f32,
}

impl Default for KalmanCfg {
    fn default() -> Self {
        Self {
            process_noise: 5.0,
            measurement_noise: 25.0,
            initial_estimate: 0.0,
            initial_covariance: 100.0,
        }
    }
}

/// Sampling loop pacing and bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopCfg {
    /// Open-loop pause after every emitted line.
    pub cycle_delay: Duration,
    /// Stop after this many cycles; `None` runs until shutdown.
    pub max_cycles: Option<u64>,
    /// Collect per-cycle timing for `CycleStats`.
    pub collect_stats: bool,
}

impl Default for LoopCfg {
    fn default() -> Self {
        Self {
            cycle_delay: Duration::from_millis(10),
            max_cycles: None,
            collect_stats: false,
        }
    }
}
