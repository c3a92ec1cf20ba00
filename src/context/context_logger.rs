//! Per-subsystem logger bound to one channel

use crate::core::{Dispatcher, ErrorDetail, LogLevel};
use std::sync::Arc;

/// Forwards every call to the shared [`Dispatcher`] under a fixed channel.
///
/// # Example
///
/// ```
/// use channel_logger::prelude::*;
/// use std::sync::Arc;
///
/// let dispatcher = Arc::new(Dispatcher::builder().build());
/// let ui = ContextLogger::new(Arc::clone(&dispatcher), "UI");
///
/// ui.info("Combat Window opened.");
/// assert_eq!(ui.channel(), "UI");
/// ```
#[derive(Clone)]
pub struct ContextLogger {
    dispatcher: Arc<Dispatcher>,
    channel: String,
}

impl ContextLogger {
    pub fn new(dispatcher: Arc<Dispatcher>, channel: impl Into<String>) -> Self {
        Self {
            dispatcher,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    #[inline]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.dispatcher.log(level, &self.channel, message, None);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn error_with(&self, message: impl Into<String>, err: &(dyn std::error::Error + 'static)) {
        self.dispatcher.log(
            LogLevel::Error,
            &self.channel,
            message,
            Some(ErrorDetail::from_error(err)),
        );
    }
}

impl std::fmt::Debug for ContextLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextLogger")
            .field("channel", &self.channel)
            .finish()
    }
}
