//! File logging; stdout belongs to the terminal UI

use crate::error::{GalleryError, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "galleria.log";

/// `<cache dir>/galleria/galleria.log`, or the working directory if there is no cache dir
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("galleria"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

/// Installs the global subscriber. The returned guard must live until exit.
pub fn init_logging(path: &Path) -> Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| LOG_FILE_NAME.into());

    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| GalleryError::ConfigError(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_file_name() {
        assert_eq!(
            default_log_path().file_name().and_then(|n| n.to_str()),
            Some(LOG_FILE_NAME)
        );
    }
}
