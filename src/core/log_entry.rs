//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error attached to a log entry: a message plus an optional trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<String>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Capture an error and its `source()` chain, one `caused by:` line per source.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        Self {
            message: err.to_string(),
            trace: if causes.is_empty() {
                None
            } else {
                Some(causes.join("\n"))
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(ref trace) = self.trace {
            write!(f, "\n{}", trace)?;
        }
        Ok(())
    }
}

/// A single accepted log call. Built once by the dispatcher and shared by
/// reference with every writer; there are no setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    timestamp: DateTime<Local>,
    level: LogLevel,
    channel: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorDetail>,
}

impl LogEntry {
    pub fn new(
        level: LogLevel,
        channel: impl Into<String>,
        message: impl Into<String>,
        error: Option<ErrorDetail>,
    ) -> Self {
        Self::at(Local::now(), level, channel, message, error)
    }

    /// Build an entry with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Local>,
        level: LogLevel,
        channel: impl Into<String>,
        message: impl Into<String>,
        error: Option<ErrorDetail>,
    ) -> Self {
        Self {
            timestamp,
            level,
            channel: channel.into(),
            message: message.into(),
            error,
        }
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }
}
