mod cli;
mod error_fmt;
mod logging;
mod sample;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use insole_config::{Config, load_curve_csv};
use insole_core::InsoleError;
use insole_core::conversions::curve_from_config;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg: Config = toml::from_str(&text)
        .map_err(|e| eyre::Report::new(InsoleError::Config(e.to_string())))
        .wrap_err_with(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .map_err(|e| eyre::Report::new(InsoleError::Config(format!("{e:#}"))))?;
    Ok(cfg)
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;

    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or("info");
    logging::init(cli.json, level, &cfg.logging)?;

    let table = match cli.curve.as_deref() {
        Some(path) => Some(load_curve_csv(path)?),
        None => None,
    };
    let curve = curve_from_config(&cfg.curve, table.as_deref());
    tracing::debug!(segments = curve.segments().len(), cap_n = curve.cap_n(), "curve loaded");

    match cli.cmd {
        Commands::Run { cycles, stats } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install Ctrl-C handler")?;

            let summary = sample::run_sampling(&cfg, curve, cycles, stats, &shutdown)?;
            if cli.json {
                eprintln!("{}", sample::summary_json(&summary));
            } else if let Some(st) = &summary.stats {
                sample::print_stats(st, summary.cycles);
            }
        }
        Commands::Convert { raw, channel } => {
            let force = sample::convert(&cfg, &curve, raw, channel)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "raw": raw, "channel": channel, "force_n": force })
                );
            } else {
                println!("{force:.1}");
            }
        }
        Commands::SelfCheck => {
            let check = sample::self_check(&cfg, &curve)?;
            if cli.json {
                let channels: Vec<_> = check
                    .channels
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "index": c.index,
                            "pin": c.pin,
                            "raw": c.raw,
                            "force_n": c.force_n,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "ok",
                        "channels": channels,
                        "filter": {
                            "steady_covariance": check.filter.steady_covariance,
                            "steady_gain": check.filter.steady_gain,
                        },
                    })
                );
            } else {
                println!("ok");
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if !cli.json {
        let _ = color_eyre::install();
    }

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}
