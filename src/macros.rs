//! Logging macros for ergonomic log message formatting.
//!
//! The level macros take a [`ContextLogger`](crate::ContextLogger) (or anything
//! with a matching `log(level, message)` method) and format the message with
//! `format!`. [`log_to!`](crate::log_to) addresses a dispatcher and channel
//! directly.
//!
//! # Examples
//!
//! ```
//! use channel_logger::prelude::*;
//! use channel_logger::info;
//! use std::sync::Arc;
//!
//! let dispatcher = Arc::new(Dispatcher::builder().build());
//! let network = ContextLogger::new(dispatcher, "Network");
//!
//! info!(network, "Server started");
//!
//! let port = 8080;
//! info!(network, "Server listening on port {}", port);
//! ```

/// Log a formatted message at `level` through a context logger.
///
/// # Examples
///
/// ```
/// # use channel_logger::prelude::*;
/// # use std::sync::Arc;
/// # let logger = ContextLogger::new(Arc::new(Dispatcher::new()), "UI");
/// use channel_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a formatted message on an explicit channel of a dispatcher.
///
/// # Examples
///
/// ```
/// # use channel_logger::prelude::*;
/// # let dispatcher = Dispatcher::new();
/// use channel_logger::log_to;
/// log_to!(dispatcher, LogLevel::Warning, "AI", "enemy spotted at {}", "gate");
/// ```
#[macro_export]
macro_rules! log_to {
    ($dispatcher:expr, $level:expr, $channel:expr, $($arg:tt)+) => {
        $dispatcher.log($level, $channel, format!($($arg)+), None)
    };
}

/// Log a debug-level message.
///
/// ```
/// # use channel_logger::prelude::*;
/// # use std::sync::Arc;
/// # let logger = ContextLogger::new(Arc::new(Dispatcher::new()), "Physics");
/// use channel_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use channel_logger::prelude::*;
/// # use std::sync::Arc;
/// # let logger = ContextLogger::new(Arc::new(Dispatcher::new()), "Save");
/// use channel_logger::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::context::ContextLogger;
    use crate::core::{Dispatcher, LogEntry, LogLevel, LogWriter, Result};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<LogEntry>>>);

    impl LogWriter for Recorder {
        fn initialize(&mut self) -> Result<()> {
            Ok(())
        }
        fn write(&self, entry: &LogEntry) -> Result<()> {
            self.0.lock().push(entry.clone());
            Ok(())
        }
        fn shutdown(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "recorder"
        }
    }

    fn setup() -> (Arc<Dispatcher>, ContextLogger, Recorder) {
        let recorder = Recorder::default();
        let dispatcher = Arc::new(Dispatcher::builder().writer(recorder.clone()).build());
        dispatcher.set_min_level(LogLevel::Debug);
        let logger = ContextLogger::new(Arc::clone(&dispatcher), "Macro");
        (dispatcher, logger, recorder)
    }

    #[test]
    fn test_level_macros() {
        let (_dispatcher, logger, recorder) = setup();
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warning!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);

        let entries = recorder.0.lock();
        let levels: Vec<LogLevel> = entries.iter().map(|e| e.level()).collect();
        assert_eq!(
            levels,
            vec![LogLevel::Debug, LogLevel::Info, LogLevel::Warning, LogLevel::Error]
        );
        assert_eq!(entries[2].message(), "Retry 1 of 3");
        assert!(entries.iter().all(|e| e.channel() == "Macro"));
    }

    #[test]
    fn test_log_to_macro() {
        let (dispatcher, _logger, recorder) = setup();
        log_to!(dispatcher, LogLevel::Info, "AI", "Formatted: {}", 42);

        let entries = recorder.0.lock();
        assert_eq!(entries[0].channel(), "AI");
        assert_eq!(entries[0].message(), "Formatted: 42");
    }
}
