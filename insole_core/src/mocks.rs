//! Test and helper mocks for insole_core

use std::collections::{HashMap, VecDeque};

use insole_traits::{AnalogInput, Attenuation};

/// An ADC that replays queued readings per pin.
///
/// Queued `None` entries fail the read. Once a pin's queue is empty it keeps
/// returning `fallback`.
#[derive(Debug, Default)]
pub struct ScriptedAdc {
    queues: HashMap<u8, VecDeque<Option<u16>>>,
    fallback: u16,
    configured: Option<(u8, Attenuation)>,
    reads: usize,
}

impl ScriptedAdc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value returned for any pin whose queue has run dry.
    pub fn with_fallback(mut self, raw: u16) -> Self {
        self.fallback = raw;
        self
    }

    pub fn push(&mut self, pin: u8, values: impl IntoIterator<Item = u16>) {
        self.queues
            .entry(pin)
            .or_default()
            .extend(values.into_iter().map(Some));
    }

    pub fn push_failure(&mut self, pin: u8) {
        self.queues.entry(pin).or_default().push_back(None);
    }

    /// Last setup passed to `configure`, if any.
    pub fn configured(&self) -> Option<(u8, Attenuation)> {
        self.configured
    }

    /// Total reads served, failed ones included.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl AnalogInput for ScriptedAdc {
    fn configure(
        &mut self,
        resolution_bits: u8,
        attenuation: Attenuation,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.configured = Some((resolution_bits, attenuation));
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        self.reads += 1;
        match self.queues.get_mut(&pin).and_then(VecDeque::pop_front) {
            Some(Some(v)) => Ok(v),
            Some(None) => Err(Box::new(std::io::Error::other(format!(
                "scripted failure on pin {pin}"
            )))),
            None => Ok(self.fallback),
        }
    }
}
