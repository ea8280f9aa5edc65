//! Timing helpers for insole_core.

use std::time::Duration;

use crate::channel::CHANNELS;
use crate::config::AcquisitionCfg;

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Time one cycle spends in settle pauses across all channels.
#[inline]
pub fn acquisition_time(acq: &AcquisitionCfg) -> Duration {
    let pauses = u64::from(acq.samples.max(1)) * CHANNELS as u64;
    let us = (acq.settle.as_micros().min(u128::from(u64::MAX)) as u64).saturating_mul(pauses);
    Duration::from_micros(us)
}

/// Expected cycle period ignoring conversion and I/O time.
#[inline]
pub fn nominal_period(acq: &AcquisitionCfg, cycle_delay: Duration) -> Duration {
    acquisition_time(acq).saturating_add(cycle_delay)
}

/// Line rate implied by a cycle period.
/// - Clamps the period to at least 1 µs to avoid division by zero.
#[inline]
pub fn rate_hz(period: Duration) -> f64 {
    let us = (period.as_micros().min(u128::from(u64::MAX)) as u64).max(1);
    MICROS_PER_SEC as f64 / us as f64
}
