//! UART sink for the force stream.
use std::io;

use rppal::uart::{Parity, Uart};

use crate::error::{HwError, Result};

/// Blocking 8N1 UART that implements `std::io::Write`.
pub struct SerialSink {
    uart: Uart,
}

impl SerialSink {
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        let mut uart = Uart::with_path(path, baud, Parity::None, 8, 1)
            .map_err(|e| HwError::Uart(format!("open {path}: {e}")))?;
        uart.set_write_mode(true)
            .map_err(|e| HwError::Uart(e.to_string()))?;
        tracing::debug!(path, baud, "serial sink open");
        Ok(Self { uart })
    }
}

impl io::Write for SerialSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.uart.write(buf).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.uart.drain().map_err(io::Error::other)
    }
}
