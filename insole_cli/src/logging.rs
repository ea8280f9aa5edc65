//! tracing subscriber setup: stderr always, JSON lines to a file when configured.

use std::path::Path;

use eyre::WrapErr;
use insole_config::Logging;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::FILE_GUARD;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn rotation(name: Option<&str>) -> Rotation {
    match name {
        Some("daily") => Rotation::DAILY,
        Some("hourly") => Rotation::HOURLY,
        _ => Rotation::NEVER,
    }
}

fn file_layer(path: &str, logging: &Logging) -> eyre::Result<BoxedLayer> {
    let path = Path::new(path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("insole.log");
    let appender = RollingFileAppender::builder()
        .rotation(rotation(logging.rotation.as_deref()))
        .filename_prefix(prefix)
        .build(dir)
        .wrap_err_with(|| format!("open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);
    Ok(fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .boxed())
}

/// Install the global subscriber. `RUST_LOG` wins over `level`.
pub fn init(json: bool, level: &str, logging: &Logging) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    layers.push(if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    });
    if let Some(path) = logging.file.as_deref() {
        layers.push(file_layer(path, logging)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .wrap_err("install tracing subscriber")
}
