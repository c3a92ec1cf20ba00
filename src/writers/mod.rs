//! Writer implementations

pub mod console;
pub mod file;

pub use console::ConsoleWriter;
pub use file::{
    default_log_directory, enforce_retention, format_file_line, is_log_file_name, FileWriter,
    FileWriterConfig, WriterState, DEFAULT_IDLE_INTERVAL, DEFAULT_MAX_FILES, SHUTDOWN_FLUSH_MARKER,
};

pub use crate::core::LogWriter;
