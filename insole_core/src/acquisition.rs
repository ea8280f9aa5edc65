//! Oversampled reads of a single analog input.

use insole_traits::{AnalogInput, Clock};

use crate::config::AcquisitionCfg;
use crate::hw_error::map_hw_error;

/// Read `pin` `cfg.samples` times, pausing `cfg.settle` after each read, and
/// return the mean truncated toward zero.
///
/// A failed read is logged and counted as a 0-count sample; the caller always
/// gets a value.
pub fn read_averaged<A, C>(adc: &mut A, clock: &C, pin: u8, cfg: &AcquisitionCfg) -> u16
where
    A: AnalogInput + ?Sized,
    C: Clock + ?Sized,
{
    let samples = cfg.samples.max(1);
    let mut sum: u64 = 0;
    for _ in 0..samples {
        match adc.read(pin) {
            Ok(raw) => sum += u64::from(raw),
            Err(e) => {
                tracing::warn!(pin, error = %map_hw_error(&*e), "adc read failed; counting as 0");
            }
        }
        clock.sleep(cfg.settle);
    }
    (sum / u64::from(samples)) as u16
}
