//! Builder for `InsoleSampler`.
//!
//! Only the converter is mandatory; everything else defaults to the stock
//! insole. Parameters are checked in `build()`.

use insole_traits::{AnalogInput, Clock, MonotonicClock};

use crate::calibration::CalibrationCurve;
use crate::channel::{CHANNELS, Channel, stock_layout};
use crate::config::{AcquisitionCfg, AdcSetup, KalmanCfg};
use crate::error::{BuildError, Result};
use crate::filter::FilterState;
use crate::sampler::InsoleSampler;

pub struct SamplerBuilder<A, C = MonotonicClock> {
    adc: Option<A>,
    clock: C,
    channels: Option<[Channel; CHANNELS]>,
    curve: Option<CalibrationCurve>,
    kalman: Option<KalmanCfg>,
    acquisition: Option<AcquisitionCfg>,
    adc_setup: Option<AdcSetup>,
}

impl<A: AnalogInput> Default for SamplerBuilder<A, MonotonicClock> {
    fn default() -> Self {
        Self {
            adc: None,
            clock: MonotonicClock::new(),
            channels: None,
            curve: None,
            kalman: None,
            acquisition: None,
            adc_setup: None,
        }
    }
}

impl<A: AnalogInput> SamplerBuilder<A, MonotonicClock> {
    pub fn new(adc: A) -> Self {
        Self::default().with_adc(adc)
    }
}

impl<A: AnalogInput> InsoleSampler<A, MonotonicClock> {
    /// Start building a sampler paced by the real clock.
    pub fn builder() -> SamplerBuilder<A, MonotonicClock> {
        SamplerBuilder::default()
    }
}

impl<A: AnalogInput, C: Clock> SamplerBuilder<A, C> {
    pub fn with_adc(mut self, adc: A) -> Self {
        self.adc = Some(adc);
        self
    }

    /// Swap the pacing clock (tests inject a simulated one).
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SamplerBuilder<A, C2> {
        SamplerBuilder {
            adc: self.adc,
            clock,
            channels: self.channels,
            curve: self.curve,
            kalman: self.kalman,
            acquisition: self.acquisition,
            adc_setup: self.adc_setup,
        }
    }

    pub fn with_channels(mut self, channels: [Channel; CHANNELS]) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_curve(mut self, curve: CalibrationCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn with_kalman(mut self, kalman: KalmanCfg) -> Self {
        self.kalman = Some(kalman);
        self
    }

    pub fn with_acquisition(mut self, acquisition: AcquisitionCfg) -> Self {
        self.acquisition = Some(acquisition);
        self
    }

    pub fn with_adc_setup(mut self, setup: AdcSetup) -> Self {
        self.adc_setup = Some(setup);
        self
    }

    pub fn build(self) -> Result<InsoleSampler<A, C>> {
        let adc = self.adc.ok_or(BuildError::MissingAdc)?;
        let kalman = self.kalman.unwrap_or_default();
        if !(kalman.process_noise.is_finite() && kalman.process_noise > 0.0) {
            return Err(BuildError::InvalidConfig("process_noise must be > 0").into());
        }
        if !(kalman.measurement_noise.is_finite() && kalman.measurement_noise > 0.0) {
            return Err(BuildError::InvalidConfig("measurement_noise must be > 0").into());
        }
        if !(kalman.initial_covariance.is_finite() && kalman.initial_covariance >= 0.0) {
            return Err(BuildError::InvalidConfig("initial_covariance must be >= 0").into());
        }
        let acquisition = self.acquisition.unwrap_or_default();
        if acquisition.samples == 0 {
            return Err(BuildError::InvalidConfig("acquisition samples must be >= 1").into());
        }
        let channels = self.channels.unwrap_or_else(stock_layout);
        for (i, ch) in channels.iter().enumerate() {
            if ch.index != i {
                return Err(BuildError::InvalidConfig("channel index out of order").into());
            }
            if ch.bounds.raw_min >= ch.bounds.raw_max {
                return Err(BuildError::InvalidConfig("channel raw_min must be < raw_max").into());
            }
        }
        let states = [FilterState::new(&kalman); CHANNELS];
        Ok(InsoleSampler {
            adc,
            clock: self.clock,
            channels,
            curve: self.curve.unwrap_or_default(),
            kalman,
            states,
            acquisition,
            adc_setup: self.adc_setup.unwrap_or_default(),
        })
    }
}
