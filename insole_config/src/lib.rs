#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and curve table parsing for the insole sampler.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; defaults reproduce the stock insole.
//! - Curve CSV loader enforces headers and the segment ordering rules.
use serde::Deserialize;
use serde::de::Deserializer;

/// Number of FSR channels on the insole.
pub const CHANNELS: usize = 6;
/// Largest raw value a 12-bit converter can report.
pub const MAX_RAW_12BIT: i32 = 4095;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttenuationCfg {
    Db0,
    Db2_5,
    Db6,
    #[default]
    Db11,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdcCfg {
    pub resolution_bits: u8,
    pub attenuation: AttenuationCfg,
    /// SPI clock for the hardware converter (Hz)
    pub spi_hz: u32,
}

impl Default for AdcCfg {
    fn default() -> Self {
        Self {
            resolution_bits: 12,
            attenuation: AttenuationCfg::Db11,
            spi_hz: 1_000_000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AcquisitionCfg {
    /// Reads averaged into one channel sample
    pub samples: u32,
    /// Pause after each read (µs)
    pub settle_us: u64,
}

impl Default for AcquisitionCfg {
    fn default() -> Self {
        Self {
            samples: 10,
            settle_us: 100,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterCfg {
    pub process_noise: f32,
    pub measurement_noise: f32,
    pub initial_estimate: f32,
    pub initial_covariance: f32,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            process_noise: 5.0,
            measurement_noise: 25.0,
            initial_estimate: 0.0,
            initial_covariance: 100.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputCfg {
    /// Open-loop pause after each emitted line (ms)
    pub cycle_delay_ms: u64,
    pub baud: u32,
    /// UART device used with the `hardware` feature
    pub port: String,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            cycle_delay_ms: 10,
            baud: 115_200,
            port: "/dev/serial0".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChannelCfg {
    pub pin: u8,
    #[serde(default)]
    pub x_cm: f32,
    #[serde(default)]
    pub y_cm: f32,
    #[serde(default)]
    pub raw_min: i32,
    #[serde(default = "default_raw_max")]
    pub raw_max: i32,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_raw_max() -> i32 {
    3259
}

/// One linear piece of the force curve:
/// `force_n = slope * (raw - pivot) + offset_n` for `raw <= upper_raw`.
///
/// CSV headers: `upper_raw,slope,pivot,offset_n`
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub upper_raw: f64,
    pub slope: f64,
    #[serde(default)]
    pub pivot: f64,
    #[serde(default)]
    pub offset_n: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CurveCfg {
    /// Optional segment table. Accepts either:
    /// - array of tables: [{ upper_raw = 2925.0, slope = 0.0335 }, ...]
    /// - array of tuples: [[2925.0, 0.0335, 0.0, 0.0], ...]
    #[serde(deserialize_with = "de_segments")]
    pub segments: Vec<CurveSegment>,
    /// Saturation force (N); defaults to the stock 76 kg cap
    pub cap_n: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub adc: AdcCfg,
    pub acquisition: AcquisitionCfg,
    pub filter: FilterCfg,
    pub output: OutputCfg,
    /// Per-sensor wiring and bounds; empty means the stock layout
    pub channels: Vec<ChannelCfg>,
    pub curve: CurveCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SegmentToml {
    Tuple((f64, f64, f64, f64)),
    Table(CurveSegment),
}

fn de_segments<'de, D>(deserializer: D) -> Result<Vec<CurveSegment>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Vec<SegmentToml>> = Option::deserialize(deserializer)?;
    let mut out = Vec::new();
    if let Some(items) = opt {
        for s in items {
            match s {
                SegmentToml::Tuple((upper_raw, slope, pivot, offset_n)) => out.push(CurveSegment {
                    upper_raw,
                    slope,
                    pivot,
                    offset_n,
                }),
                SegmentToml::Table(seg) => out.push(seg),
            }
        }
    }
    Ok(out)
}

/// Check a segment table: non-empty, finite, strictly increasing upper bounds.
pub fn validate_segments(segments: &[CurveSegment]) -> eyre::Result<()> {
    if segments.is_empty() {
        eyre::bail!("curve requires at least one segment");
    }
    for (i, s) in segments.iter().enumerate() {
        if !(s.upper_raw.is_finite()
            && s.slope.is_finite()
            && s.pivot.is_finite()
            && s.offset_n.is_finite())
        {
            eyre::bail!("curve segment {i} has a non-finite value");
        }
        if i > 0 && s.upper_raw <= segments[i - 1].upper_raw {
            eyre::bail!(
                "curve segment upper bounds must be strictly increasing (segment {} <= segment {})",
                i,
                i - 1
            );
        }
    }
    Ok(())
}

pub fn load_curve_csv(path: &std::path::Path) -> eyre::Result<Vec<CurveSegment>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open curve CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["upper_raw", "slope", "pivot", "offset_n"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "curve CSV must have headers 'upper_raw,slope,pivot,offset_n', got: {}",
            actual.join(",")
        );
    }

    let mut segments = Vec::new();
    for (idx, rec) in rdr.deserialize::<CurveSegment>().enumerate() {
        match rec {
            Ok(seg) => segments.push(seg),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    validate_segments(&segments)?;
    Ok(segments)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // ADC
        if self.adc.resolution_bits != 12 {
            eyre::bail!("adc.resolution_bits must be 12");
        }
        if self.adc.spi_hz == 0 {
            eyre::bail!("adc.spi_hz must be > 0");
        }

        // Acquisition
        if self.acquisition.samples == 0 {
            eyre::bail!("acquisition.samples must be >= 1");
        }
        if self.acquisition.samples > 1000 {
            eyre::bail!("acquisition.samples is unreasonably large (>1000)");
        }
        if self.acquisition.settle_us > 10_000 {
            eyre::bail!("acquisition.settle_us is unreasonably large (>10ms)");
        }

        // Filter
        if !(self.filter.process_noise.is_finite() && self.filter.process_noise > 0.0) {
            eyre::bail!("filter.process_noise must be > 0");
        }
        if !(self.filter.measurement_noise.is_finite() && self.filter.measurement_noise > 0.0) {
            eyre::bail!("filter.measurement_noise must be > 0");
        }
        if !self.filter.initial_estimate.is_finite() {
            eyre::bail!("filter.initial_estimate must be finite");
        }
        if !(self.filter.initial_covariance.is_finite() && self.filter.initial_covariance >= 0.0)
        {
            eyre::bail!("filter.initial_covariance must be >= 0");
        }

        // Output
        if self.output.cycle_delay_ms > 10_000 {
            eyre::bail!("output.cycle_delay_ms is unreasonably large (>10s)");
        }
        if self.output.baud == 0 {
            eyre::bail!("output.baud must be > 0");
        }

        // Channels
        if !self.channels.is_empty() {
            if self.channels.len() != CHANNELS {
                eyre::bail!(
                    "channels must list exactly {CHANNELS} sensors, got {}",
                    self.channels.len()
                );
            }
            for (i, ch) in self.channels.iter().enumerate() {
                if ch.raw_min >= ch.raw_max {
                    eyre::bail!("channels[{i}].raw_min must be < raw_max");
                }
                if ch.raw_max > MAX_RAW_12BIT {
                    eyre::bail!("channels[{i}].raw_max must be <= {MAX_RAW_12BIT}");
                }
                if !(ch.x_cm.is_finite() && ch.y_cm.is_finite()) {
                    eyre::bail!("channels[{i}] coordinates must be finite");
                }
                if self.channels[..i].iter().any(|other| other.pin == ch.pin) {
                    eyre::bail!("channels[{i}].pin {} is used twice", ch.pin);
                }
            }
        }

        // Curve
        if !self.curve.segments.is_empty() {
            validate_segments(&self.curve.segments)?;
        }
        if let Some(cap) = self.curve.cap_n
            && !(cap.is_finite() && cap >= 0.0)
        {
            eyre::bail!("curve.cap_n must be >= 0");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
