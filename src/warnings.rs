//! Process-ambient runtime warning stream.
//!
//! Libraries and framework glue call [`warn`] (or the [`runtime_warning!`]
//! macro) to flag deprecations and suspect configuration. The stream goes
//! nowhere until a handler is captured into it, at which point warnings are
//! formatted and filtered exactly like application log records.

use crate::error::{Result, RotologError};
use crate::level::Severity;
use crate::logger::Handler;
use crate::record::Record;
use std::sync::{Arc, Mutex};

static CAPTURED: Mutex<Vec<Arc<dyn Handler>>> = Mutex::new(Vec::new());

/// Route the ambient warning stream into a handler.
///
/// Warnings arrive as `WARNING`-severity records, so a handler with a higher
/// threshold will drop them like any other record.
pub fn capture(handler: Arc<dyn Handler>) {
    if let Ok(mut captured) = CAPTURED.lock() {
        captured.push(handler);
    }
}

/// Detach a previously captured handler from the warning stream
pub fn release(handler: &Arc<dyn Handler>) {
    if let Ok(mut captured) = CAPTURED.lock() {
        captured.retain(|h| !Arc::ptr_eq(h, handler));
    }
}

/// Emit a runtime warning. A no-op when nothing is captured.
pub fn warn(message: impl Into<String>, source_path: &str, line: u32) -> Result<()> {
    let captured = CAPTURED
        .lock()
        .map_err(|_| RotologError::LogError("warning handler set is poisoned".to_string()))?;

    if captured.is_empty() {
        return Ok(());
    }

    let record = Record::new(Severity::Warning, message, source_path, line);
    for handler in captured.iter() {
        handler.emit(&record)?;
    }
    Ok(())
}

/// Emit a runtime warning, capturing the source file and line of the call
/// site.
#[macro_export]
macro_rules! runtime_warning {
    ($($arg:tt)+) => {
        $crate::warnings::warn(format!($($arg)+), file!(), line!())
    };
}
