#![no_main]
use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use insole_core::{CalibrationCurve, ChannelBounds};

#[derive(Debug, Arbitrary)]
struct Input {
    raw: i32,
    raw_min: i16,
    span: u16,
}

fuzz_target!(|input: Input| {
    let curve = CalibrationCurve::stock();
    let bounds = ChannelBounds {
        raw_min: i32::from(input.raw_min),
        raw_max: i32::from(input.raw_min) + i32::from(input.span.max(1)),
    };
    let f = curve.force(input.raw, bounds);
    assert!(f.is_finite());
    assert!(f >= 0.0 || input.raw > bounds.raw_min);
    assert!(f <= 745.56 + 1e-3 || input.raw < bounds.raw_max);
});
