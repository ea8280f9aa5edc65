#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core insole sampling pipeline (hardware-agnostic).
//!
//! All converter access goes through `insole_traits::AnalogInput` and all
//! pauses through `insole_traits::Clock`, so the loop runs unchanged against
//! the SPI converter, the simulator, or a scripted test double.
//!
//! ## Pipeline
//!
//! For each of the six channels, once per cycle:
//!
//! - **Acquisition**: 10 reads, 100 µs apart, integer mean (`acquisition`)
//! - **Calibration**: ordered piecewise-linear raw → N curve (`calibration`)
//! - **Smoothing**: scalar Kalman filter with per-channel state (`filter`)
//!
//! The six smoothed forces are written as one line (`frame`), followed by an
//! open-loop 10 ms pause (`runner`).

pub mod acquisition;
pub mod builder;
pub mod calibration;
pub mod channel;
pub mod config;
pub mod conversions;
pub mod error;
pub mod filter;
pub mod frame;
pub mod hw_error;
pub mod mocks;
pub mod runner;
pub mod sampler;
pub mod util;

pub use builder::SamplerBuilder;
pub use calibration::{CalibrationCurve, Segment};
pub use channel::{CHANNELS, Channel, ChannelBounds};
pub use config::{AcquisitionCfg, AdcSetup, KalmanCfg, LoopCfg};
pub use error::{BuildError, InsoleError};
pub use filter::FilterState;
pub use frame::{Frame, format_line};
pub use runner::{CycleStats, RunSummary, StopReason, run};
pub use sampler::InsoleSampler;
