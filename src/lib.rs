//! # Channel Logger
//!
//! Channel-aware logging with multiple output writers and a background file
//! writer.
//!
//! ## Features
//!
//! - **Channels**: every entry carries a subsystem tag that can be muted
//! - **Multiple Writers**: console, timestamped session files, and custom sinks
//! - **Non-blocking File Output**: a single worker thread persists queued entries
//! - **Retention**: only the newest session files are kept on disk
//! - **Never Fatal**: writer failures are reported to stderr, never to the caller

pub mod context;
pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::context::{CombatLogger, ContextLogger};
    pub use crate::core::{
        DispatchMetrics, Dispatcher, DispatcherBuilder, ErrorDetail, LogEntry, LogLevel,
        LogWriter, LoggerError, LoggerSettings, Result, SettingsProvider,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::writers::{ConsoleWriter, FileWriter, FileWriterConfig};
}

pub use context::{CombatLogger, ContextLogger};
pub use core::{
    parse_muted_channels, DispatchMetrics, Dispatcher, DispatcherBuilder, ErrorDetail, LogEntry,
    LogLevel, LogWriter, LoggerError, LoggerSettings, Result, SettingsProvider,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use writers::{ConsoleWriter, FileWriter, FileWriterConfig, WriterState};
