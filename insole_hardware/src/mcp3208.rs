//! MCP3208 12-bit SPI ADC.
//!
//! The insole's six FSR dividers are wired to inputs CH0..CH5. Callers keep
//! addressing sensors by their logical pin ids; `pin_map` translates a pin id
//! to the converter input at the same position.
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::trace;

use insole_traits::{AnalogInput, Attenuation};

use crate::error::{HwError, Result};

/// Native resolution of the converter.
pub const RESOLUTION_BITS: u8 = 12;
/// Number of single-ended inputs.
pub const INPUTS: usize = 8;

pub struct Mcp3208 {
    spi: Spi,
    pin_map: Vec<u8>,
}

impl Mcp3208 {
    /// Open SPI0/CE0 at `clock_hz`. `pin_map[i]` is the logical pin wired to CHi.
    pub fn new(pin_map: &[u8], clock_hz: u32) -> Result<Self> {
        if pin_map.len() > INPUTS {
            return Err(HwError::Spi(format!(
                "{} pins mapped but the converter has {INPUTS} inputs",
                pin_map.len()
            )));
        }
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, clock_hz, Mode::Mode0)
            .map_err(|e| HwError::Spi(format!("open spi0: {e}")))?;
        Ok(Self {
            spi,
            pin_map: pin_map.to_vec(),
        })
    }

    fn input_for(&self, pin: u8) -> Result<u8> {
        self.pin_map
            .iter()
            .position(|p| *p == pin)
            .map(|i| i as u8)
            .ok_or(HwError::UnknownPin(pin))
    }

    pub fn read_input(&mut self, input: u8) -> Result<u16> {
        // start bit, single-ended, 3-bit channel select spread across two bytes
        let tx = [0x06 | ((input & 0x04) >> 2), (input & 0x03) << 6, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        let raw = (u16::from(rx[1] & 0x0F) << 8) | u16::from(rx[2]);
        trace!(input, raw, "mcp3208 conversion");
        Ok(raw)
    }
}

impl AnalogInput for Mcp3208 {
    fn configure(
        &mut self,
        resolution_bits: u8,
        attenuation: Attenuation,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if resolution_bits != RESOLUTION_BITS {
            return Err(Box::new(HwError::Resolution(resolution_bits)));
        }
        // Input span is set by VREF on this part.
        tracing::debug!(%attenuation, "mcp3208 has a fixed reference; attenuation ignored");
        Ok(())
    }

    fn read(&mut self, pin: u8) -> std::result::Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let input = self.input_for(pin)?;
        Ok(self.read_input(input)?)
    }
}
