//! `From` implementations bridging `insole_config` types to `insole_core` types.

use std::time::Duration;

use insole_traits::Attenuation;

use crate::calibration::{CalibrationCurve, STOCK_CAP_N, STOCK_SEGMENTS, Segment};
use crate::channel::{CHANNELS, Channel, ChannelBounds, stock_layout};
use crate::config::{AcquisitionCfg, AdcSetup, KalmanCfg, LoopCfg};
use crate::error::{InsoleError, Result};

// ── ADC ──────────────────────────────────────────────────────────────────────

/// Config spelling of the attenuation onto the converter-level enum.
pub fn attenuation_from_config(a: insole_config::AttenuationCfg) -> Attenuation {
    use insole_config::AttenuationCfg as A;
    match a {
        A::Db0 => Attenuation::Db0,
        A::Db2_5 => Attenuation::Db2_5,
        A::Db6 => Attenuation::Db6,
        A::Db11 => Attenuation::Db11,
    }
}

impl From<&insole_config::AdcCfg> for AdcSetup {
    fn from(c: &insole_config::AdcCfg) -> Self {
        Self {
            resolution_bits: c.resolution_bits,
            attenuation: attenuation_from_config(c.attenuation),
        }
    }
}

// ── Acquisition / filter / loop ──────────────────────────────────────────────

impl From<&insole_config::AcquisitionCfg> for AcquisitionCfg {
    fn from(c: &insole_config::AcquisitionCfg) -> Self {
        Self {
            samples: c.samples,
            settle: Duration::from_micros(c.settle_us),
        }
    }
}

impl From<&insole_config::FilterCfg> for KalmanCfg {
    fn from(c: &insole_config::FilterCfg) -> Self {
        Self {
            process_noise: c.process_noise,
            measurement_noise: c.measurement_noise,
            initial_estimate: c.initial_estimate,
            initial_covariance: c.initial_covariance,
        }
    }
}

impl From<&insole_config::OutputCfg> for LoopCfg {
    fn from(c: &insole_config::OutputCfg) -> Self {
        Self {
            cycle_delay: Duration::from_millis(c.cycle_delay_ms),
            ..LoopCfg::default()
        }
    }
}

// ── Curve ────────────────────────────────────────────────────────────────────

impl From<&insole_config::CurveSegment> for Segment {
    fn from(s: &insole_config::CurveSegment) -> Self {
        Segment::new(s.upper_raw, s.slope, s.pivot, s.offset_n)
    }
}

/// Stock curve unless the config (or a CSV table) supplies segments.
/// A CSV table takes precedence over `[curve] segments`.
pub fn curve_from_config(
    cfg: &insole_config::CurveCfg,
    table: Option<&[insole_config::CurveSegment]>,
) -> CalibrationCurve {
    let cap_n = cfg.cap_n.unwrap_or(STOCK_CAP_N);
    let segments: Vec<Segment> = match table {
        Some(t) if !t.is_empty() => t.iter().map(Segment::from).collect(),
        _ if !cfg.segments.is_empty() => cfg.segments.iter().map(Segment::from).collect(),
        _ => STOCK_SEGMENTS.to_vec(),
    };
    CalibrationCurve::from_segments(segments, cap_n).unwrap_or_else(CalibrationCurve::stock)
}

// ── Channels ─────────────────────────────────────────────────────────────────

/// Stock layout when `cfgs` is empty, otherwise exactly `CHANNELS` entries.
pub fn channels_from_config(cfgs: &[insole_config::ChannelCfg]) -> Result<[Channel; CHANNELS]> {
    if cfgs.is_empty() {
        return Ok(stock_layout());
    }
    if cfgs.len() != CHANNELS {
        return Err(InsoleError::Config(format!(
            "expected {CHANNELS} channels, got {}",
            cfgs.len()
        ))
        .into());
    }
    let stock = stock_layout();
    Ok(std::array::from_fn(|i| {
        let c = &cfgs[i];
        Channel {
            index: i,
            pin: c.pin,
            position_cm: (c.x_cm, c.y_cm),
            bounds: ChannelBounds {
                raw_min: c.raw_min,
                raw_max: c.raw_max,
            },
            label: c.label.clone().unwrap_or_else(|| stock[i].label.clone()),
        }
    }))
}
