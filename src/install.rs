use crate::config::LogConfig;
use crate::error::{Result, RotologError};
use crate::logger::Logger;
use crate::sink::RotatingFileSink;
use crate::warnings;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Install a rotating file handler on the application logger.
///
/// Returns `Ok(None)` with no side effects when `logfile` is unset. The
/// parent directory of the log file must already exist; it is never created
/// here, so a typoed path fails loudly at startup instead of logging into an
/// unexpected location. The file itself is only created on first write.
///
/// Repeated calls attach a fresh handler each time and produce duplicate log
/// lines; deduplication is the caller's responsibility.
pub fn install_handler(
    config: &LogConfig,
    logger: &Logger,
) -> Result<Option<Arc<RotatingFileSink>>> {
    let logfile = match &config.logfile {
        Some(logfile) => Path::new(logfile),
        None => return Ok(None),
    };

    let basedir = logfile.parent().unwrap_or_else(|| Path::new(""));
    if !basedir.exists() {
        return Err(RotologError::LogDirectoryMissing(basedir.to_path_buf()));
    }

    let sink = Arc::new(RotatingFileSink::new(
        logfile,
        config.max_bytes,
        config.backup_count,
        config.level,
    ));
    logger.add_handler(sink.clone());
    debug!(
        logfile = %logfile.display(),
        level = %config.level,
        max_bytes = config.max_bytes,
        backup_count = config.backup_count,
        "installed rotating file handler"
    );

    if config.capture_warnings {
        warnings::capture(sink.clone());
        debug!(logfile = %logfile.display(), "capturing runtime warnings");
    }

    Ok(Some(sink))
}
