//! Piecewise-linear raw → Newton curve.
//!
//! The stock table was measured on the insole's FSR stack against a
//! 0–76 kg reference load. Segments are evaluated strictly in order and the
//! first one whose `upper` bound admits the value wins, so two adjacent
//! segments may share a formula without changing the result.

use crate::channel::ChannelBounds;

/// Saturation force of the stock curve: 76 kg at 9.8 m/s².
pub const STOCK_CAP_N: f64 = 745.56;

/// `force = slope * (raw - pivot) + offset` for `raw <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub upper: f64,
    pub slope: f64,
    pub pivot: f64,
    pub offset: f64,
}

impl Segment {
    pub const fn new(upper: f64, slope: f64, pivot: f64, offset: f64) -> Self {
        Self {
            upper,
            slope,
            pivot,
            offset,
        }
    }

    #[inline]
    fn eval(&self, v: f64) -> f64 {
        self.slope * (v - self.pivot) + self.offset
    }
}

/// Stock segments, 0–10 kg, 10–20 kg, 20–40 kg, 40–53 kg, 53–76 kg.
pub const STOCK_SEGMENTS: [Segment; 5] = [
    Segment::new(2925.0, 0.0335, 0.0, 0.0),
    Segment::new(2934.0, 1.604, 2934.0, 196.2),
    Segment::new(3056.33, 1.604, 2934.0, 196.2),
    Segment::new(3217.5, 0.791, 3056.33, 392.4),
    Segment::new(3259.0, 5.437, 3217.5, 519.93),
];

/// Ordered segment table plus saturation cap.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationCurve {
    segments: Vec<Segment>,
    cap_n: f64,
}

impl Default for CalibrationCurve {
    fn default() -> Self {
        Self::stock()
    }
}

impl CalibrationCurve {
    pub fn stock() -> Self {
        Self {
            segments: STOCK_SEGMENTS.to_vec(),
            cap_n: STOCK_CAP_N,
        }
    }

    /// Build from an already-validated segment table. Returns `None` when
    /// the table is empty.
    pub fn from_segments(segments: Vec<Segment>, cap_n: f64) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(Self { segments, cap_n })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn cap_n(&self) -> f64 {
        self.cap_n
    }

    /// Force in Newtons for an averaged raw reading.
    #[inline]
    pub fn force(&self, raw: i32, bounds: ChannelBounds) -> f32 {
        self.force_at(f64::from(raw), bounds)
    }

    /// Same as [`force`](Self::force) for a fractional raw value.
    ///
    /// The clamps run first (`<= raw_min` → 0, `>= raw_max` → cap), then the
    /// segments in table order. Values past the last `upper` bound fall
    /// through to the last segment.
    pub fn force_at(&self, v: f64, bounds: ChannelBounds) -> f32 {
        if v <= f64::from(bounds.raw_min) {
            return 0.0;
        }
        if v >= f64::from(bounds.raw_max) {
            return self.cap_n as f32;
        }
        let seg = self
            .segments
            .iter()
            .find(|s| v <= s.upper)
            .or_else(|| self.segments.last());
        match seg {
            Some(s) => s.eval(v) as f32,
            None => 0.0,
        }
    }
}
