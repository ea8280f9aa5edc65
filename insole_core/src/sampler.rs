//! Per-cycle pipeline: acquisition → calibration → smoothing for all channels.

use eyre::WrapErr;
use insole_traits::{AnalogInput, Clock};

use crate::acquisition::read_averaged;
use crate::calibration::CalibrationCurve;
use crate::channel::{CHANNELS, Channel};
use crate::config::{AcquisitionCfg, AdcSetup, KalmanCfg};
use crate::error::Result;
use crate::filter::FilterState;
use crate::frame::Frame;
use crate::hw_error::map_hw_error;

/// Owns the converter, the channel table and one filter state per channel.
///
/// The channel table and curve are fixed at construction; only the filter
/// states change from cycle to cycle.
pub struct InsoleSampler<A: AnalogInput, C: Clock> {
    pub(crate) adc: A,
    pub(crate) clock: C,
    pub(crate) channels: [Channel; CHANNELS],
    pub(crate) curve: CalibrationCurve,
    pub(crate) kalman: KalmanCfg,
    pub(crate) states: [FilterState; CHANNELS],
    pub(crate) acquisition: AcquisitionCfg,
    pub(crate) adc_setup: AdcSetup,
}

impl<A: AnalogInput, C: Clock> core::fmt::Debug for InsoleSampler<A, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InsoleSampler")
            .field("pins", &self.channels.iter().map(|c| c.pin).collect::<Vec<_>>())
            .field("estimates", &self.states.map(|s| s.estimate))
            .finish()
    }
}

impl<A: AnalogInput, C: Clock> InsoleSampler<A, C> {
    /// Apply the converter setup. Call once before the first cycle.
    pub fn setup(&mut self) -> Result<()> {
        let AdcSetup {
            resolution_bits,
            attenuation,
        } = self.adc_setup;
        self.adc
            .configure(resolution_bits, attenuation)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("adc configure")?;
        tracing::debug!(resolution_bits, %attenuation, "adc configured");
        Ok(())
    }

    /// Averaged raw reading of one channel.
    pub fn read_raw(&mut self, idx: usize) -> u16 {
        read_averaged(
            &mut self.adc,
            &self.clock,
            self.channels[idx].pin,
            &self.acquisition,
        )
    }

    /// Run every channel through the pipeline once and return the smoothed forces.
    pub fn cycle(&mut self) -> Frame {
        let mut forces = [0.0f32; CHANNELS];
        for (i, out) in forces.iter_mut().enumerate() {
            let raw = self.read_raw(i);
            let force = self.curve.force(i32::from(raw), self.channels[i].bounds);
            *out = self.states[i].update(force, &self.kalman);
            tracing::trace!(channel = i, raw, force, smoothed = *out, "channel sample");
        }
        Frame::new(forces)
    }

    pub fn channels(&self) -> &[Channel; CHANNELS] {
        &self.channels
    }

    pub fn states(&self) -> &[FilterState; CHANNELS] {
        &self.states
    }

    pub fn curve(&self) -> &CalibrationCurve {
        &self.curve
    }

    pub fn kalman(&self) -> &KalmanCfg {
        &self.kalman
    }

    pub fn acquisition(&self) -> &AcquisitionCfg {
        &self.acquisition
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn adc(&self) -> &A {
        &self.adc
    }
}
