//! Logging setup for symdex.
//!
//! Rolling file logs under `.symdex/logs` plus an optional stderr layer.
//! The stderr filter honours `RUST_LOG`.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Flushes pending log writes when dropped.
///
/// Keep it alive for the whole run, or buffered lines are lost.
#[must_use = "Dropping this guard will stop logging - keep it alive for the program's lifetime"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    _stderr_guard: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &LoggingConfig, project_root: &Path) -> Result<LoggingGuard> {
    let mut file_guard = None;
    let mut stderr_guard = None;

    let file_layer = if config.enabled {
        let log_dir = resolve_log_dir(&config.directory, project_root);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let appender = RollingFileAppender::new(
            parse_rotation(&config.rotation),
            &log_dir,
            &config.file_prefix,
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(parse_level(&config.level)),
        )
    } else {
        None
    };

    let stderr_layer = if config.stderr {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        stderr_guard = Some(guard);

        Some(
            fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_filter(default_env_filter()),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to initialize logging subscriber")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        _stderr_guard: stderr_guard,
    })
}

/// Stderr-only logging for failures before the config is read
pub fn init_early_logging() {
    let _ = tracing_subscriber::registry()
        .with(default_env_filter())
        .with(fmt::layer().with_target(false))
        .try_init();
}

fn default_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("symdex=info"))
}

fn resolve_log_dir(directory: &Path, project_root: &Path) -> PathBuf {
    if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        project_root.join(directory)
    }
}

fn parse_level(level: &str) -> EnvFilter {
    let level_lower = level.to_lowercase();
    let level_str = match level_lower.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => level_lower.as_str(),
        _ => {
            eprintln!("Warning: Unknown log level '{}', defaulting to 'debug'", level);
            "debug"
        }
    };
    EnvFilter::new(format!("symdex={}", level_str))
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => {
            eprintln!(
                "Warning: Unknown rotation strategy '{}', defaulting to 'daily'",
                rotation
            );
            Rotation::DAILY
        }
    }
}
