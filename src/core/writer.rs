//! Writer trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A sink that receives every accepted log entry.
///
/// `write` runs on the logging caller's thread and takes `&self` so that
/// concurrent callers can dispatch in parallel; sinks that need mutable state
/// keep it behind their own synchronization.
pub trait LogWriter: Send + Sync {
    fn initialize(&mut self) -> Result<()>;
    fn write(&self, entry: &LogEntry) -> Result<()>;
    fn shutdown(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
