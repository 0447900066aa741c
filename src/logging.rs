// 📝 Logging - tracing subscriber writing to the configured log file

use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Keep the returned guard alive until exit,
/// otherwise buffered lines are lost.
pub fn init(config: &CalculatorConfig) -> Result<WorkerGuard> {
    let dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = config
        .log_file
        .file_name()
        .ok_or_else(|| {
            CalculatorError::configuration(format!(
                "log file {} has no file name",
                config.log_file.display()
            ))
        })?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| CalculatorError::configuration(format!("Logging setup failed: {}", e)))?;

    tracing::info!("Logging initialized at: {}", config.log_file.display());
    Ok(guard)
}
