use crate::error::{Result, RotologError};
use crate::level::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Rotating-file logging configuration.
///
/// Populated once at application start and never mutated afterwards. With
/// `logfile` unset the whole feature is disabled and installation is a
/// no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Target log file; absolute or templated path, `None` disables logging
    #[serde(default)]
    pub logfile: Option<String>,

    /// Route ambient runtime warnings into the same sink
    #[serde(default)]
    pub capture_warnings: bool,

    /// Number of rotated backup files to retain
    #[serde(default = "default_backup_count")]
    pub backup_count: u32,

    /// Rotation threshold in bytes; 0 never rotates by size
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Minimum severity passed through the sink
    #[serde(default = "default_level")]
    pub level: Severity,
}

// Default value functions for serde
fn default_backup_count() -> u32 {
    5
}

fn default_max_bytes() -> u64 {
    104_857_600 // 100 MiB
}

fn default_level() -> Severity {
    Severity::Warning
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            logfile: None,
            capture_warnings: false,
            backup_count: default_backup_count(),
            max_bytes: default_max_bytes(),
            level: default_level(),
        }
    }
}

impl LogConfig {
    /// Defaults for a host application, with the severity threshold lowered
    /// to `DEBUG` when the host runs in debug mode
    pub fn default_for(debug: bool) -> Self {
        Self {
            level: if debug {
                Severity::Debug
            } else {
                Severity::Warning
            },
            ..Self::default()
        }
    }

    /// Load configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<LogConfig> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RotologError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let config: LogConfig = match extension {
            "toml" => toml::from_str(&contents)
                .map_err(|e| RotologError::InvalidConfig(format!("Failed to parse TOML: {}", e)))?,
            "json" => serde_json::from_str(&contents)
                .map_err(|e| RotologError::InvalidConfig(format!("Failed to parse JSON: {}", e)))?,
            _ => {
                return Err(RotologError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(logfile) = &self.logfile {
            if logfile.trim().is_empty() {
                return Err(RotologError::InvalidConfig(
                    "logfile must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Substitute the `{instance_path}` and `{sys_prefix}` tokens in the
    /// configured log file path.
    ///
    /// Runs at initialization time, before any directory validation.
    pub fn resolve_paths(&mut self, instance_path: &Path, sys_prefix: &Path) {
        if let Some(logfile) = &self.logfile {
            let resolved = logfile
                .replace("{instance_path}", &instance_path.to_string_lossy())
                .replace("{sys_prefix}", &sys_prefix.to_string_lossy());
            self.logfile = Some(resolved);
        }
    }

    /// Configured log file as a path, if logging is enabled
    pub fn logfile_path(&self) -> Option<PathBuf> {
        self.logfile.as_ref().map(PathBuf::from)
    }
}
