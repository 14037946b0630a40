use crate::level::Severity;
use chrono::{DateTime, Local};

/// A single log event routed through the application logger
#[derive(Debug, Clone)]
pub struct Record {
    /// Severity of the event
    pub level: Severity,
    /// Rendered log message
    pub message: String,
    /// Source file the event originated from
    pub source_path: String,
    /// Line number within the source file
    pub line: u32,
    /// Local time the record was created
    pub timestamp: DateTime<Local>,
}

impl Record {
    /// Create a record stamped with the current local time
    pub fn new(
        level: Severity,
        message: impl Into<String>,
        source_path: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            source_path: source_path.into(),
            line,
            timestamp: Local::now(),
        }
    }
}
