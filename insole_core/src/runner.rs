//! The sampling loop: `RESET`, then one line per cycle until stopped.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::WrapErr;
use insole_traits::{AnalogInput, Clock};

use crate::config::LoopCfg;
use crate::error::{InsoleError, Result};
use crate::frame::RESET_MARKER;
use crate::sampler::InsoleSampler;
use crate::util::nominal_period;

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `LoopCfg::max_cycles` reached.
    CycleLimit,
    /// Shutdown flag observed between cycles.
    Shutdown,
}

/// Busy time (acquisition + emission, excluding the end-of-cycle pause) per cycle.
///
/// Running aggregates only (Welford variance); size does not depend on run length.
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    count: u64,
    min_us: u64,
    max_us: u64,
    mean_us: f64,
    m2: f64,
    /// Cycles whose full period exceeded the nominal one by more than 10%.
    pub late_cycles: u64,
    pub nominal_period_us: u64,
}

impl CycleStats {
    pub fn new(nominal_period_us: u64) -> Self {
        Self {
            nominal_period_us,
            ..Self::default()
        }
    }

    /// Fold one cycle's busy time into the aggregates.
    pub fn record(&mut self, busy_us: u64) {
        if self.count == 0 {
            self.min_us = busy_us;
            self.max_us = busy_us;
        } else {
            self.min_us = self.min_us.min(busy_us);
            self.max_us = self.max_us.max(busy_us);
        }
        self.count += 1;
        let x = busy_us as f64;
        let delta = x - self.mean_us;
        self.mean_us += delta / self.count as f64;
        self.m2 += delta * (x - self.mean_us);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min_us(&self) -> u64 {
        self.min_us
    }

    pub fn max_us(&self) -> u64 {
        self.max_us
    }

    pub fn avg_us(&self) -> f64 {
        self.mean_us
    }

    /// Sample standard deviation; 0 with fewer than two cycles.
    pub fn stdev_us(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.m2 / (self.count as f64 - 1.0)).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cycles: u64,
    pub stop: StopReason,
    pub stats: Option<CycleStats>,
}

fn emit(sink: &mut impl Write, line: &str) -> Result<()> {
    writeln!(sink, "{line}")
        .map_err(|e| eyre::Report::new(InsoleError::Io(e.to_string())))
        .wrap_err("emit line")
}

fn flush(sink: &mut impl Write) -> Result<()> {
    sink.flush()
        .map_err(|e| eyre::Report::new(InsoleError::Io(e.to_string())))
        .wrap_err("flush sink")
}

/// Configure the converter, announce `RESET`, then sample until `max_cycles`
/// or until `shutdown` is set.
///
/// Sink write failures end the run; sensor failures never do.
pub fn run<A, C, W>(
    sampler: &mut InsoleSampler<A, C>,
    sink: &mut W,
    cfg: &LoopCfg,
    shutdown: &AtomicBool,
) -> Result<RunSummary>
where
    A: AnalogInput,
    C: Clock,
    W: Write,
{
    sampler.setup()?;
    emit(sink, RESET_MARKER)?;
    flush(sink)?;

    let nominal = nominal_period(sampler.acquisition(), cfg.cycle_delay);
    let late_after_us = nominal.as_micros() as u64 * 11 / 10;
    let mut stats = cfg
        .collect_stats
        .then(|| CycleStats::new(nominal.as_micros() as u64));

    tracing::info!(
        cycle_delay_ms = cfg.cycle_delay.as_millis() as u64,
        max_cycles = cfg.max_cycles,
        "sampling start"
    );

    let mut cycles: u64 = 0;
    let stop = loop {
        if shutdown.load(Ordering::Relaxed) {
            break StopReason::Shutdown;
        }
        if cfg.max_cycles.is_some_and(|max| cycles >= max) {
            break StopReason::CycleLimit;
        }

        let t0 = sampler.clock().now();
        let frame = sampler.cycle();
        emit(sink, &frame.to_line())?;
        let busy_us = sampler.clock().us_since(t0);
        sampler.clock().sleep(cfg.cycle_delay);
        cycles += 1;

        if let Some(st) = stats.as_mut() {
            st.record(busy_us);
            if sampler.clock().us_since(t0) > late_after_us {
                st.late_cycles += 1;
            }
        }
    };
    flush(sink)?;

    tracing::info!(cycles, ?stop, "sampling stop");
    Ok(RunSummary {
        cycles,
        stop,
        stats,
    })
}
