//! One cycle's worth of smoothed forces and its wire format.

use std::fmt;

use crate::channel::CHANNELS;

/// Boot marker written once after setup.
pub const RESET_MARKER: &str = "RESET";

/// Smoothed forces in Newtons, indexed by channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub forces: [f32; CHANNELS],
}

impl Frame {
    pub fn new(forces: [f32; CHANNELS]) -> Self {
        Self { forces }
    }

    /// Line payload without the trailing newline.
    pub fn to_line(&self) -> String {
        format_line(&self.forces)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_values(f, &self.forces)
    }
}

/// One decimal, rounded half away from zero the way serial firmware prints
/// floats: sign first, then `|v| + 0.05` in double precision, truncated.
fn write_tenths(w: &mut impl fmt::Write, v: f32) -> fmt::Result {
    if v.is_nan() {
        return w.write_str("nan");
    }
    if v.is_infinite() {
        return w.write_str("inf");
    }
    let mut x = f64::from(v);
    if x < 0.0 {
        w.write_char('-')?;
        x = -x;
    }
    x += 0.05;
    let whole = x.trunc();
    let tenth = ((x - whole) * 10.0) as u8;
    write!(w, "{whole:.0}.{tenth}")
}

fn write_values(w: &mut impl fmt::Write, values: &[f32]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            w.write_char(',')?;
        }
        write_tenths(w, *v)?;
    }
    Ok(())
}

/// Comma-separated values with one decimal each, no trailing comma.
pub fn format_line(values: &[f32]) -> String {
    let mut s = String::with_capacity(values.len() * 7);
    // fmt::Write for String cannot fail
    let _ = write_values(&mut s, values);
    s
}
