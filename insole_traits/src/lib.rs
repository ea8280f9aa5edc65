pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::fmt;

/// Input attenuation applied by the ADC front end before conversion.
///
/// Larger attenuation widens the measurable voltage span at the cost of
/// resolution near zero. FSR dividers on a 3.3 V rail need the full span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attenuation {
    Db0,
    Db2_5,
    Db6,
    #[default]
    Db11,
}

impl fmt::Display for Attenuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Attenuation::Db0 => "0dB",
            Attenuation::Db2_5 => "2.5dB",
            Attenuation::Db6 => "6dB",
            Attenuation::Db11 => "11dB",
        };
        f.write_str(s)
    }
}

/// Multi-input analog-to-digital converter addressed by an opaque pin id.
pub trait AnalogInput {
    /// One-time front-end setup applied before the first read.
    fn configure(
        &mut self,
        resolution_bits: u8,
        attenuation: Attenuation,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// A single raw conversion from `pin`.
    fn read(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    fn configure(
        &mut self,
        resolution_bits: u8,
        attenuation: Attenuation,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).configure(resolution_bits, attenuation)
    }

    fn read(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read(pin)
    }
}
