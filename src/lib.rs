// Library exports for rotolog

pub mod config;
pub mod error;
pub mod install;
pub mod level;
pub mod logger;
pub mod record;
pub mod sink;
pub mod warnings;

pub use config::LogConfig;
pub use error::{Result, RotologError};
pub use install::install_handler;
pub use level::Severity;
pub use logger::{Handler, Logger};
pub use record::Record;
pub use sink::RotatingFileSink;
