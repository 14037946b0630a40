use crate::error::RotologError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity threshold.
///
/// The variants form a total order from least to most severe:
/// `Notset < Debug < Info < Warning < Error < Critical`. A record passes a
/// sink with threshold `t` when its severity is `>= t`, so `Notset` lets
/// everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Notset,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Upper-case name as it appears in log lines and configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Notset => "NOTSET",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = RotologError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOTSET" => Ok(Severity::Notset),
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(RotologError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: CRITICAL, ERROR, WARNING, INFO, DEBUG, NOTSET",
                s
            ))),
        }
    }
}
