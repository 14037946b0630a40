use crate::error::{Result, RotologError};
use crate::record::Record;
use std::sync::{Arc, RwLock};

/// Destination for formatted log records.
///
/// Implementations must be safe to share across threads; the logger fans a
/// record out to every attached handler from whichever thread logged it.
pub trait Handler: Send + Sync {
    /// Process one record. Handlers apply their own severity threshold.
    fn emit(&self, record: &Record) -> Result<()>;

    /// Flush any buffered output
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Application logger that dispatches records to attached handlers.
///
/// Handlers are attached once during initialization and shared for the
/// process lifetime. Attaching the same handler twice is not deduplicated
/// and produces duplicate log lines.
pub struct Logger {
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
}

impl Logger {
    /// Create a logger with no handlers attached
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Attach a handler to this logger
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers.push(handler);
        }
    }

    /// Number of handlers currently attached
    pub fn handler_count(&self) -> usize {
        self.handlers.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Dispatch a record to every attached handler
    pub fn log(&self, record: &Record) -> Result<()> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| RotologError::LogError("logger handler set is poisoned".to_string()))?;

        for handler in handlers.iter() {
            handler.emit(record)?;
        }

        Ok(())
    }

    /// Flush every attached handler
    pub fn flush(&self) -> Result<()> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| RotologError::LogError("logger handler set is poisoned".to_string()))?;

        for handler in handlers.iter() {
            handler.flush()?;
        }

        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a formatted message through a [`Logger`], capturing the source file
/// and line of the call site.
///
/// ```
/// use rotolog::{log_to, logger::Logger, level::Severity};
///
/// let logger = Logger::new();
/// log_to!(logger, Severity::Info, "started worker {}", 3).unwrap();
/// ```
#[macro_export]
macro_rules! log_to {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(&$crate::record::Record::new(
            $level,
            format!($($arg)+),
            file!(),
            line!(),
        ))
    };
}
