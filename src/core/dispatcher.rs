//! Central dispatcher
//!
//! The dispatcher owns the writer list and the filters (global enable flag,
//! minimum level, muted channels). Every accepted entry is handed to each
//! writer in registration order on the calling thread. One dispatcher per
//! process is expected; the entry point creates it and shares it as an `Arc`.

use super::{
    diagnostics,
    error::LoggerError,
    log_entry::{ErrorDetail, LogEntry},
    log_level::LogLevel,
    metrics::DispatchMetrics,
    settings::{parse_muted_channels, LoggerSettings, SettingsProvider},
    writer::LogWriter,
};
use crate::writers::{default_log_directory, ConsoleWriter, FileWriter};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default time the file writer waits for its worker during shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

pub struct Dispatcher {
    initialized: AtomicBool,
    shut_down: AtomicBool,
    enabled: AtomicBool,
    min_level: RwLock<LogLevel>,
    /// Lower-cased channel names
    muted_channels: RwLock<HashSet<String>>,
    writers: RwLock<Vec<Box<dyn LogWriter>>>,
    metrics: DispatchMetrics,
    /// Serializes initialize and shutdown
    lifecycle: Mutex<()>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
            min_level: RwLock::new(LogLevel::Info),
            muted_channels: RwLock::new(HashSet::new()),
            writers: RwLock::new(Vec::new()),
            metrics: DispatchMetrics::new(),
            lifecycle: Mutex::new(()),
        }
    }

    /// Register the default writers (console, then file) and apply `settings`.
    ///
    /// Returns `false` without doing anything if the dispatcher was already
    /// initialized or already shut down.
    pub fn initialize(&self, settings: &dyn SettingsProvider) -> bool {
        if self.initialized.load(Ordering::Acquire) || self.shut_down.load(Ordering::Acquire) {
            return false;
        }

        let directory = settings.log_directory().unwrap_or_else(default_log_directory);
        let writers: Vec<Box<dyn LogWriter>> = vec![
            Box::new(ConsoleWriter::new()),
            Box::new(FileWriter::in_directory(directory)),
        ];
        self.initialize_with_writers(writers, settings)
    }

    /// Same as [`Dispatcher::initialize`] but registers `writers` instead of
    /// the defaults.
    pub fn initialize_with_writers(
        &self,
        writers: Vec<Box<dyn LogWriter>>,
        settings: &dyn SettingsProvider,
    ) -> bool {
        let _guard = self.lifecycle.lock();
        if self.initialized.load(Ordering::Acquire) || self.shut_down.load(Ordering::Acquire) {
            return false;
        }

        for writer in writers {
            self.add_writer(writer);
        }
        self.apply_settings(settings);
        self.initialized.store(true, Ordering::Release);
        true
    }

    /// Initialize `writer` and append it to the writer list.
    ///
    /// A writer whose initialization fails is still registered; it is expected
    /// to degrade to discarding entries. Once the dispatcher has shut down the
    /// writer is dropped without being initialized and `false` is returned.
    pub fn add_writer(&self, mut writer: Box<dyn LogWriter>) -> bool {
        if self.shut_down.load(Ordering::Acquire) {
            return false;
        }

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| writer.initialize()));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => diagnostics::report_error(writer.name(), &e),
            Err(payload) => diagnostics::report_error(
                writer.name(),
                &LoggerError::writer_panicked(
                    writer.name(),
                    diagnostics::panic_message(payload.as_ref()),
                ),
            ),
        }

        let mut writers = self.writers.write();
        if self.shut_down.load(Ordering::Acquire) {
            // Shutdown already took the list; close this one here
            drop(writers);
            if let Err(e) = writer.shutdown() {
                diagnostics::report_error(writer.name(), &e);
            }
            return false;
        }
        writers.push(writer);
        true
    }

    /// Apply muted channels, minimum level and enable flag from `settings`.
    ///
    /// An out-of-range level index is ignored and the current level is kept.
    pub fn apply_settings(&self, settings: &dyn SettingsProvider) {
        for channel in parse_muted_channels(&settings.muted_channels()) {
            self.mute(&channel);
        }

        if let Some(index) = settings.min_log_level() {
            match LogLevel::from_setting_index(index) {
                Some(level) => self.set_min_level(level),
                None => diagnostics::report_error(
                    "settings",
                    &LoggerError::config(
                        "settings",
                        format!("min_log_level {} is out of range, keeping {}", index, self.min_level()),
                    ),
                ),
            }
        }

        if let Some(enabled) = settings.enabled() {
            self.set_enabled(enabled);
        }
    }

    /// Whether an entry with `level` on `channel` would reach the writers.
    pub fn would_log(&self, level: LogLevel, channel: &str) -> bool {
        self.initialized.load(Ordering::Acquire)
            && !self.shut_down.load(Ordering::Acquire)
            && self.enabled.load(Ordering::Relaxed)
            && level >= *self.min_level.read()
            && !self.is_muted(channel)
    }

    pub fn log(
        &self,
        level: LogLevel,
        channel: &str,
        message: impl Into<String>,
        error: Option<ErrorDetail>,
    ) {
        if !self.would_log(level, channel) {
            self.metrics.record_filtered();
            return;
        }

        let entry = LogEntry::new(level, channel, message, error);
        let writers = self.writers.read();
        Self::dispatch(&writers, &entry, &self.metrics);
        self.metrics.record_dispatched();
    }

    /// Hand `entry` to every writer, isolating each one's errors and panics.
    fn dispatch(writers: &[Box<dyn LogWriter>], entry: &LogEntry, metrics: &DispatchMetrics) {
        for writer in writers {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| writer.write(entry)));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metrics.record_writer_failure();
                    diagnostics::report_error(writer.name(), &e);
                }
                Err(payload) => {
                    metrics.record_writer_failure();
                    diagnostics::report_error(
                        writer.name(),
                        &LoggerError::writer_panicked(
                            writer.name(),
                            diagnostics::panic_message(payload.as_ref()),
                        ),
                    );
                }
            }
        }
    }

    #[inline]
    pub fn debug(&self, channel: &str, message: impl Into<String>) {
        self.log(LogLevel::Debug, channel, message, None);
    }

    #[inline]
    pub fn info(&self, channel: &str, message: impl Into<String>) {
        self.log(LogLevel::Info, channel, message, None);
    }

    #[inline]
    pub fn warning(&self, channel: &str, message: impl Into<String>) {
        self.log(LogLevel::Warning, channel, message, None);
    }

    #[inline]
    pub fn error(&self, channel: &str, message: impl Into<String>) {
        self.log(LogLevel::Error, channel, message, None);
    }

    /// Log at error level with `err` and its source chain attached.
    pub fn error_with(
        &self,
        channel: &str,
        message: impl Into<String>,
        err: &(dyn std::error::Error + 'static),
    ) {
        self.log(LogLevel::Error, channel, message, Some(ErrorDetail::from_error(err)));
    }

    pub fn mute(&self, channel: &str) {
        self.muted_channels.write().insert(channel.to_lowercase());
    }

    pub fn unmute(&self, channel: &str) {
        self.muted_channels.write().remove(&channel.to_lowercase());
    }

    pub fn is_muted(&self, channel: &str) -> bool {
        let muted = self.muted_channels.read();
        !muted.is_empty() && muted.contains(&channel.to_lowercase())
    }

    /// Muted channels in lower case, sorted.
    pub fn muted_channels(&self) -> Vec<String> {
        let muted = self.muted_channels.read();
        muted.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub fn writer_count(&self) -> usize {
        self.writers.read().len()
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Shut down every writer in registration order and clear the list.
    ///
    /// Only the first call does anything; it returns `true`. Logging stops as
    /// soon as shutdown begins.
    pub fn shutdown(&self) -> bool {
        let _guard = self.lifecycle.lock();
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return false;
        }

        // Writers leave the list before their shutdown runs, so concurrent
        // loggers never wait on a writer's bounded drain.
        let mut writers = std::mem::take(&mut *self.writers.write());
        for writer in writers.iter_mut() {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| writer.shutdown()));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => diagnostics::report_error(writer.name(), &e),
                Err(payload) => diagnostics::report_error(
                    writer.name(),
                    &LoggerError::writer_panicked(
                        writer.name(),
                        diagnostics::panic_message(payload.as_ref()),
                    ),
                ),
            }
        }
        true
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if !self.shut_down.load(Ordering::Acquire) {
            self.shutdown();
        }
    }
}

/// Builder producing an initialized [`Dispatcher`]
///
/// # Example
///
/// ```
/// use channel_logger::prelude::*;
///
/// let dispatcher = Dispatcher::builder()
///     .writer(ConsoleWriter::with_colors(false))
///     .settings(LoggerSettings::new().with_muted_channels("Physics"))
///     .build();
///
/// assert!(dispatcher.is_initialized());
/// assert!(dispatcher.is_muted("physics"));
/// ```
pub struct DispatcherBuilder {
    writers: Vec<Box<dyn LogWriter>>,
    settings: LoggerSettings,
    default_writers: bool,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            writers: Vec::new(),
            settings: LoggerSettings::default(),
            default_writers: false,
        }
    }

    /// Append a writer after any default writers
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: LogWriter + 'static>(mut self, writer: W) -> Self {
        self.writers.push(Box::new(writer));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn settings(mut self, settings: LoggerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register the console and file writers first
    #[must_use = "builder methods return a new value"]
    pub fn default_writers(mut self, enabled: bool) -> Self {
        self.default_writers = enabled;
        self
    }

    /// Directory for the default file writer
    #[must_use = "builder methods return a new value"]
    pub fn log_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.log_directory = Some(dir.into());
        self
    }

    pub fn build(self) -> Dispatcher {
        let mut writers: Vec<Box<dyn LogWriter>> = Vec::new();
        if self.default_writers {
            let directory = self
                .settings
                .log_directory
                .clone()
                .unwrap_or_else(default_log_directory);
            writers.push(Box::new(ConsoleWriter::new()));
            writers.push(Box::new(FileWriter::in_directory(directory)));
        }
        writers.extend(self.writers);

        let dispatcher = Dispatcher::new();
        dispatcher.initialize_with_writers(writers, &self.settings);
        dispatcher
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }
}
