//! Scalar Kalman filter used to smooth each channel's force.
//!
//! The model is a constant: the prediction step keeps the previous estimate
//! and only grows the error covariance by the process noise. That suits a
//! quasi-static pressure signal sampled at ~100 Hz.

use crate::config::KalmanCfg;

/// Per-channel estimator state. Lives for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    pub estimate: f32,
    pub error_covariance: f32,
}

impl FilterState {
    pub fn new(cfg: &KalmanCfg) -> Self {
        Self {
            estimate: cfg.initial_estimate,
            error_covariance: cfg.initial_covariance,
        }
    }

    /// Fold one measurement in and return the new estimate.
    #[inline]
    pub fn update(&mut self, measurement: f32, cfg: &KalmanCfg) -> f32 {
        let predicted = self.error_covariance + cfg.process_noise;
        let gain = predicted / (predicted + cfg.measurement_noise);
        self.estimate += gain * (measurement - self.estimate);
        self.error_covariance = (1.0 - gain) * predicted;
        self.estimate
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(&KalmanCfg::default())
    }
}

/// Fixed point of the covariance recursion `P = (1 - K)(P + Q)`.
///
/// With `S = P + Q` the recursion reduces to `S² - QS - QR = 0`, so
/// `P = (Q + sqrt(Q² + 4QR)) / 2 - Q`.
pub fn steady_state_covariance(cfg: &KalmanCfg) -> f32 {
    let q = f64::from(cfg.process_noise);
    let r = f64::from(cfg.measurement_noise);
    let s = (q + (q * q + 4.0 * q * r).sqrt()) / 2.0;
    (s - q) as f32
}

/// Kalman gain once the covariance has settled.
pub fn steady_state_gain(cfg: &KalmanCfg) -> f32 {
    let p = steady_state_covariance(cfg) + cfg.process_noise;
    p / (p + cfg.measurement_noise)
}
