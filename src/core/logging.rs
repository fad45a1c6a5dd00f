//! Logging Module
//!
//! Structured logging for the engine and binary:
//! - JSON file logs with daily rotation (tracing-appender)
//! - Optional pretty stdout layer
//! - `log` crate events bridged into `tracing` by the subscriber
//! - Gzip compression of rotated files in the background

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "charsheet.log";

/// Initialize the logging system.
///
/// This sets up:
/// 1. A file logger (JSON formatted) in `log_dir`.
/// 2. A stdout logger (pretty formatted) when enabled in config.
/// 3. Redirects standard `log` crate events to `tracing`.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown.
pub fn init(config: &LoggingConfig, log_dir: &Path) -> WorkerGuard {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter(config));

    let stdout_layer = config.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .pretty()
            .with_filter(env_filter(config))
    });

    // Also installs the `log` -> `tracing` bridge
    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    // Compress old logs in background (after init so log macros work)
    let log_dir_clone = log_dir.to_path_buf();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

/// `RUST_LOG` if set, else the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Compress rotated log files that are not today's and not yet compressed.
fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if should_compress(name, &today_suffix) {
            if let Err(e) = compress_file(&path) {
                log::warn!("Failed to compress log file {:?}: {}", path, e);
            }
        }
    }
}

fn should_compress(file_name: &str, today_suffix: &str) -> bool {
    file_name.starts_with(&format!("{}.", LOG_FILE_PREFIX))
        && !file_name.ends_with(today_suffix)
        && !file_name.ends_with(".gz")
}

fn compress_file(path: &Path) -> io::Result<()> {
    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);

    let mut input = fs::File::open(path)?;
    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(())
}
