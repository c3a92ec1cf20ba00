//! Core logger types and traits

pub(crate) mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod metrics;
pub mod settings;
pub mod writer;

pub use dispatcher::{Dispatcher, DispatcherBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use log_entry::{ErrorDetail, LogEntry};
pub use log_level::LogLevel;
pub use metrics::DispatchMetrics;
pub use settings::{parse_muted_channels, LoggerSettings, SettingsProvider};
pub use writer::LogWriter;
