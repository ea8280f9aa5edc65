pub mod error;
#[cfg(feature = "hardware")]
pub mod mcp3208;
#[cfg(feature = "hardware")]
pub mod serial;

use insole_traits::{AnalogInput, Attenuation};

use crate::error::HwError;

/// Largest resolution any supported converter reports.
const MAX_RESOLUTION_BITS: u8 = 16;

/// Waveform produced by [`SimulatedAdc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// Triangle wave per pin, phase-shifted so the six sensors load in turn
    /// like a foot rolling from heel to toe.
    Gait { period_reads: u64 },
    /// Every read returns the same raw value.
    Constant(u16),
    /// Every read fails.
    Failing,
}

/// Simulated FSR front end.
///
/// The gait waveform swings between `GAIT_FLOOR` and `GAIT_FLOOR + GAIT_SPAN`,
/// which covers the steep part of the insole calibration curve.
#[derive(Debug, Clone)]
pub struct SimulatedAdc {
    mode: SimMode,
    max_raw: u16,
    tick: u64,
}

const GAIT_FLOOR: u64 = 2900;
const GAIT_SPAN: u64 = 350;

impl SimulatedAdc {
    pub fn new() -> Self {
        Self::with_mode(SimMode::Gait { period_reads: 600 })
    }

    pub fn with_mode(mode: SimMode) -> Self {
        SimulatedAdc {
            mode,
            max_raw: 4095,
            tick: 0,
        }
    }

    pub fn constant(raw: u16) -> Self {
        Self::with_mode(SimMode::Constant(raw))
    }

    pub fn failing() -> Self {
        Self::with_mode(SimMode::Failing)
    }

    pub fn max_raw(&self) -> u16 {
        self.max_raw
    }

    fn gait_sample(&self, pin: u8, period_reads: u64) -> u64 {
        let period = period_reads.max(2);
        let half = period / 2;
        let phase = (self.tick + u64::from(pin) * 37) % period;
        let rise = if phase < half { phase } else { period - phase };
        GAIT_FLOOR + rise * GAIT_SPAN / half
    }
}

impl Default for SimulatedAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogInput for SimulatedAdc {
    fn configure(
        &mut self,
        resolution_bits: u8,
        attenuation: Attenuation,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if resolution_bits == 0 || resolution_bits > MAX_RESOLUTION_BITS {
            return Err(Box::new(HwError::Resolution(resolution_bits)));
        }
        self.max_raw = ((1u32 << resolution_bits) - 1) as u16;
        tracing::debug!(
            resolution_bits,
            %attenuation,
            max_raw = self.max_raw,
            "simulated adc configured"
        );
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let raw = match self.mode {
            SimMode::Failing => return Err(Box::new(HwError::ReadFailed(pin))),
            SimMode::Constant(v) => u64::from(v),
            SimMode::Gait { period_reads } => self.gait_sample(pin, period_reads),
        };
        self.tick = self.tick.wrapping_add(1);
        Ok(raw.min(u64::from(self.max_raw)) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_is_clamped_to_resolution() {
        let mut adc = SimulatedAdc::constant(4000);
        adc.configure(10, Attenuation::Db11).unwrap();
        assert_eq!(adc.read(36).unwrap(), 1023);
    }

    #[test]
    fn failing_reports_pin() {
        let mut adc = SimulatedAdc::failing();
        let err = adc.read(39).unwrap_err();
        assert!(err.to_string().contains("pin 39"));
    }

    #[test]
    fn rejects_zero_resolution() {
        let mut adc = SimulatedAdc::new();
        assert!(adc.configure(0, Attenuation::Db0).is_err());
    }
}
