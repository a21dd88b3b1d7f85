use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Directory for hourly rolling log files; stdout only when unset
pub const LOG_DIR: &str = "LOG_DIR";

/// Initialise tracing with stdout output and, given a directory, a non-blocking file appender
///
/// Honours `RUST_LOG`, falling back to `default_level`. Hold the returned guard
/// until exit so buffered file output gets flushed.
pub fn init(app_name: &str, log_dir: Option<&Path>, default_level: Level) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let _ = std::fs::create_dir_all(dir);
            let file_appender = tracing_appender::rolling::hourly(dir, format!("{app_name}.log"));
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(non_blocking).with_target(true).with_thread_ids(true).with_line_number(true).with_ansi(false).compact();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = fmt::layer().with_writer(io::stdout).with_target(true).with_line_number(true).with_ansi(true).compact();

    tracing_subscriber::registry().with(env_filter).with(file_layer).with(stdout_layer).init();

    guard
}

/// [`init`] with the log directory taken from `LOG_DIR`
pub fn init_from_env(app_name: &str, default_level: Level) -> Option<WorkerGuard> {
    let log_dir = std::env::var(LOG_DIR).ok().filter(|dir| !dir.trim().is_empty()).map(PathBuf::from);
    init(app_name, log_dir.as_deref(), default_level)
}
