//! Config mapping, hardware assembly, and the subcommand bodies.

use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use eyre::WrapErr;
use insole_config::Config;
use insole_core::conversions::channels_from_config;
use insole_core::error::Result as CoreResult;
use insole_core::filter::{steady_state_covariance, steady_state_gain};
use insole_core::hw_error::map_hw_error_dyn;
use insole_core::util::rate_hz;
use insole_core::{
    AdcSetup, CHANNELS, CalibrationCurve, Channel, CycleStats, InsoleError, InsoleSampler,
    KalmanCfg, LoopCfg, RunSummary, SamplerBuilder,
};
use insole_traits::{AnalogInput, MonotonicClock};

/// Constant raw value served on every simulated read.
pub const SIM_RAW_ENV: &str = "INSOLE_SIM_RAW";
/// Any value other than empty or `0` makes every simulated read fail.
pub const SIM_FAIL_ENV: &str = "INSOLE_SIM_FAIL";

#[cfg(not(feature = "hardware"))]
fn sim_adc() -> CoreResult<insole_hardware::SimulatedAdc> {
    use insole_hardware::SimulatedAdc;

    if std::env::var(SIM_FAIL_ENV).is_ok_and(|v| !v.is_empty() && v != "0") {
        tracing::warn!("{SIM_FAIL_ENV} set; every read will fail");
        return Ok(SimulatedAdc::failing());
    }
    match std::env::var(SIM_RAW_ENV) {
        Ok(v) => {
            let raw: u16 = v.trim().parse().map_err(|e| {
                InsoleError::Config(format!("{SIM_RAW_ENV}={v:?} is not a raw count: {e}"))
            })?;
            Ok(SimulatedAdc::constant(raw))
        }
        Err(_) => Ok(SimulatedAdc::new()),
    }
}

/// The converter for this build: MCP3208 over SPI with `hardware`, otherwise
/// the simulator.
pub fn make_adc(cfg: &Config, pins: &[u8]) -> CoreResult<Box<dyn AnalogInput>> {
    #[cfg(feature = "hardware")]
    {
        use insole_core::hw_error::map_hw_error;

        let adc = insole_hardware::mcp3208::Mcp3208::new(pins, cfg.adc.spi_hz)
            .map_err(|e| eyre::Report::new(map_hw_error(&e)))
            .wrap_err("open mcp3208")?;
        tracing::info!(spi_hz = cfg.adc.spi_hz, ?pins, "mcp3208 ready");
        Ok(Box::new(adc))
    }
    #[cfg(not(feature = "hardware"))]
    {
        let _ = (cfg, pins);
        tracing::info!("using simulated adc");
        Ok(Box::new(sim_adc()?))
    }
}

/// Where data lines go: the UART with `hardware`, otherwise stdout.
pub fn make_sink(cfg: &Config) -> CoreResult<Box<dyn Write>> {
    #[cfg(feature = "hardware")]
    {
        use insole_core::hw_error::map_hw_error;

        let port = insole_hardware::serial::SerialSink::open(&cfg.output.port, cfg.output.baud)
            .map_err(|e| eyre::Report::new(map_hw_error(&e)))
            .wrap_err_with(|| format!("open serial port {}", cfg.output.port))?;
        Ok(Box::new(port))
    }
    #[cfg(not(feature = "hardware"))]
    {
        let _ = cfg;
        Ok(Box::new(std::io::stdout().lock()))
    }
}

pub fn build_sampler<A: AnalogInput>(
    cfg: &Config,
    channels: [Channel; CHANNELS],
    curve: CalibrationCurve,
    adc: A,
) -> CoreResult<InsoleSampler<A, MonotonicClock>> {
    SamplerBuilder::new(adc)
        .with_channels(channels)
        .with_curve(curve)
        .with_kalman((&cfg.filter).into())
        .with_acquisition((&cfg.acquisition).into())
        .with_adc_setup((&cfg.adc).into())
        .build()
}

pub fn run_sampling(
    cfg: &Config,
    curve: CalibrationCurve,
    cycles: Option<u64>,
    stats: bool,
    shutdown: &AtomicBool,
) -> CoreResult<RunSummary> {
    let channels = channels_from_config(&cfg.channels)?;
    let pins: Vec<u8> = channels.iter().map(|c| c.pin).collect();
    let adc = make_adc(cfg, &pins)?;
    let mut sampler = build_sampler(cfg, channels, curve, adc)?;
    let mut sink = make_sink(cfg)?;

    let mut loop_cfg: LoopCfg = (&cfg.output).into();
    loop_cfg.max_cycles = cycles;
    loop_cfg.collect_stats = stats;

    insole_core::run(&mut sampler, &mut sink, &loop_cfg, shutdown)
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelCheck {
    pub index: usize,
    pub pin: u8,
    pub raw: u16,
    pub force_n: f32,
}

/// Where every channel's filter settles for the configured noise levels.
#[derive(Debug, Clone, Copy)]
pub struct FilterCheck {
    pub steady_covariance: f32,
    pub steady_gain: f32,
}

#[derive(Debug, Clone)]
pub struct SelfCheck {
    pub channels: Vec<ChannelCheck>,
    pub filter: FilterCheck,
}

/// Configure the converter and read every channel once. Unlike the sampling
/// loop, a failed read here is an error.
pub fn self_check(cfg: &Config, curve: &CalibrationCurve) -> CoreResult<SelfCheck> {
    let channels = channels_from_config(&cfg.channels)?;
    let pins: Vec<u8> = channels.iter().map(|c| c.pin).collect();
    let mut adc = make_adc(cfg, &pins)?;

    let setup: AdcSetup = (&cfg.adc).into();
    adc.configure(setup.resolution_bits, setup.attenuation)
        .map_err(|e| eyre::Report::new(map_hw_error_dyn(&*e)))
        .wrap_err("adc configure")?;

    let mut out = Vec::with_capacity(CHANNELS);
    for ch in &channels {
        let raw = adc
            .read(ch.pin)
            .map_err(|e| eyre::Report::new(map_hw_error_dyn(&*e)))
            .wrap_err_with(|| format!("read channel {} (pin {})", ch.index, ch.pin))?;
        let force_n = curve.force(i32::from(raw), ch.bounds);
        tracing::debug!(channel = ch.index, pin = ch.pin, raw, force_n, "self-check read");
        out.push(ChannelCheck {
            index: ch.index,
            pin: ch.pin,
            raw,
            force_n,
        });
    }

    let kalman: KalmanCfg = (&cfg.filter).into();
    let filter = FilterCheck {
        steady_covariance: steady_state_covariance(&kalman),
        steady_gain: steady_state_gain(&kalman),
    };
    tracing::debug!(
        steady_covariance = filter.steady_covariance,
        steady_gain = filter.steady_gain,
        "self-check filter"
    );
    Ok(SelfCheck {
        channels: out,
        filter,
    })
}

/// Calibrated force for one raw reading on one channel.
pub fn convert(cfg: &Config, curve: &CalibrationCurve, raw: i32, channel: usize) -> CoreResult<f32> {
    let channels = channels_from_config(&cfg.channels)?;
    let ch = channels.get(channel).ok_or_else(|| {
        InsoleError::Config(format!("channel {channel} out of range (0..{CHANNELS})"))
    })?;
    Ok(curve.force(raw, ch.bounds))
}

/// Print busy-time stats to stderr.
pub fn print_stats(stats: &CycleStats, cycles: u64) {
    let period = Duration::from_micros(stats.nominal_period_us);
    eprintln!("\n--- Insole Stats ---");
    eprintln!("Cycles: {cycles}");
    eprintln!(
        "Nominal period (us): {} (~{:.1} lines/s)",
        stats.nominal_period_us,
        rate_hz(period)
    );
    eprintln!(
        "Busy min/avg/max/stdev (us): {} / {:.1} / {} / {:.1}",
        stats.min_us(),
        stats.avg_us(),
        stats.max_us(),
        stats.stdev_us()
    );
    eprintln!("Late cycles (> 110% period): {}", stats.late_cycles);
    eprintln!("--------------------\n");
}

pub fn summary_json(summary: &RunSummary) -> serde_json::Value {
    use serde_json::json;

    let stop = match summary.stop {
        insole_core::StopReason::CycleLimit => "cycle_limit",
        insole_core::StopReason::Shutdown => "shutdown",
    };
    let mut obj = json!({ "cycles": summary.cycles, "stop": stop });
    if let Some(st) = &summary.stats {
        obj["stats"] = json!({
            "nominal_period_us": st.nominal_period_us,
            "busy_min_us": st.min_us(),
            "busy_avg_us": st.avg_us(),
            "busy_max_us": st.max_us(),
            "busy_stdev_us": st.stdev_us(),
            "late_cycles": st.late_cycles,
        });
    }
    obj
}
