//! Background file writer with log retention
//!
//! Entries are pushed onto an unbounded channel by any number of producer
//! threads and written by a single worker thread, so the logging caller never
//! waits on disk I/O. Each session writes to its own timestamped file and
//! only the newest files in the log directory are kept.

use crate::core::diagnostics;
use crate::core::{LogEntry, LogWriter, LoggerError, Result};
use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime};

/// Number of log files kept in the log directory
pub const DEFAULT_MAX_FILES: usize = 50;

/// How long the worker waits for entries before re-checking for cancellation
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(50);

/// Prefix of lines written by the synchronous drain during shutdown
pub const SHUTDOWN_FLUSH_MARKER: &str = "[SHUTDOWN FLUSH] ";

const LOG_FILE_PREFIX: &str = "log_";
const LOG_FILE_EXTENSION: &str = ".txt";
const MAX_NAME_ATTEMPTS: usize = 1000;

type SharedSink = Arc<Mutex<Option<BufWriter<File>>>>;

/// Platform log directory: `<local data dir>/<executable name>/logs`.
///
/// Falls back to the system temp directory when the platform has no local
/// data directory.
pub fn default_log_directory() -> PathBuf {
    let app = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(app)
        .join("logs")
}

/// Whether `name` follows the `log_*.txt` pattern used for session files.
pub fn is_log_file_name(name: &str) -> bool {
    name.len() > LOG_FILE_PREFIX.len() + LOG_FILE_EXTENSION.len()
        && name.starts_with(LOG_FILE_PREFIX)
        && name.ends_with(LOG_FILE_EXTENSION)
}

/// Delete every log file in `dir` beyond the `keep` newest.
///
/// Files are ordered by creation time, falling back to modification time where
/// the filesystem does not record creation, with the file name as tie-break.
/// Individual deletion failures are reported and skipped. Returns the number
/// of files removed.
pub fn enforce_retention(dir: &Path, keep: usize) -> Result<usize> {
    let entries = fs::read_dir(dir).map_err(|e| {
        LoggerError::retention(dir.display().to_string(), format!("Failed to list directory: {}", e))
    })?;

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for item in entries {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                diagnostics::report_error(
                    "file",
                    &LoggerError::retention(dir.display().to_string(), e.to_string()),
                );
                continue;
            }
        };

        let path = item.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_log_file_name);
        if !is_log {
            continue;
        }

        let metadata = match item.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                diagnostics::report_error(
                    "file",
                    &LoggerError::retention(path.display().to_string(), e.to_string()),
                );
                continue;
            }
        };

        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((created, path));
    }

    // Newest first
    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    let mut removed = 0;
    for (_, path) in files.iter().skip(keep) {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => diagnostics::report_error(
                "file",
                &LoggerError::retention(
                    path.display().to_string(),
                    format!("Failed to delete old log: {}", e),
                ),
            ),
        }
    }

    Ok(removed)
}

/// Highest collision suffix among existing session files named for `stamp`.
///
/// The bare `log_<stamp>.txt` counts as suffix 0. Returns `None` when no file
/// for the stamp exists or the directory cannot be listed.
fn highest_session_suffix(dir: &Path, stamp: &str) -> Option<usize> {
    let base = format!("{}{}", LOG_FILE_PREFIX, stamp);
    fs::read_dir(dir)
        .ok()?
        .filter_map(|item| item.ok())
        .filter_map(|item| item.file_name().into_string().ok())
        .filter_map(|name| {
            let rest = name.strip_prefix(&base)?.strip_suffix(LOG_FILE_EXTENSION)?;
            if rest.is_empty() {
                Some(0)
            } else {
                rest.strip_prefix('_')?.parse().ok()
            }
        })
        .max()
}

/// Escape newlines, carriage returns and tabs so a field cannot forge extra
/// columns or fake entries.
fn sanitize_field(field: &str) -> String {
    field
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Format an entry as `timestamp\tLEVEL\tchannel\tmessage`, followed by the
/// error description on its own line(s).
pub fn format_file_line(entry: &LogEntry) -> String {
    let mut line = format!(
        "{}\t{}\t{}\t{}",
        entry.timestamp().format("%Y-%m-%d %H:%M:%S%.3f"),
        entry.level(),
        sanitize_field(entry.channel()),
        sanitize_field(entry.message())
    );

    if let Some(error) = entry.error() {
        line.push('\n');
        line.push_str(&error.to_string());
    }

    line
}

/// Configuration for [`FileWriter`]
///
/// # Examples
///
/// ```
/// use channel_logger::writers::FileWriterConfig;
/// use std::time::Duration;
///
/// let config = FileWriterConfig::new("/tmp/game-logs")
///     .with_max_files(10)
///     .with_idle_interval(Duration::from_millis(20));
/// assert_eq!(config.max_files, 10);
/// ```
#[derive(Debug, Clone)]
pub struct FileWriterConfig {
    /// Directory holding the session files
    pub directory: PathBuf,
    /// Number of newest log files kept on initialize
    pub max_files: usize,
    /// Worker wait between cancellation checks
    pub idle_interval: Duration,
    /// Bound on the shutdown wait for the worker
    pub shutdown_timeout: Duration,
}

impl FileWriterConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            max_files: DEFAULT_MAX_FILES,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            shutdown_timeout: crate::core::DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for FileWriterConfig {
    fn default() -> Self {
        Self::new(default_log_directory())
    }
}

/// Lifecycle of a [`FileWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Uninitialized,
    Running,
    Draining,
    Closed,
}

/// Writer that queues entries and persists them on a background thread
///
/// # Example
///
/// ```no_run
/// use channel_logger::prelude::*;
///
/// let dispatcher = Dispatcher::builder()
///     .writer(FileWriter::in_directory("/var/log/my-game"))
///     .build();
///
/// dispatcher.info("Save", "game saved");
/// dispatcher.shutdown();
/// ```
pub struct FileWriter {
    config: FileWriterConfig,
    current_path: Option<PathBuf>,
    sink: SharedSink,
    sender: Sender<LogEntry>,
    receiver: Receiver<LogEntry>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    state: WriterState,
}

impl FileWriter {
    pub fn new(config: FileWriterConfig) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            config,
            current_path: None,
            sink: Arc::new(Mutex::new(None)),
            sender,
            receiver,
            cancelled: Arc::new(AtomicBool::new(false)),
            worker: None,
            state: WriterState::Uninitialized,
        }
    }

    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self::new(FileWriterConfig::new(directory))
    }

    /// Writer rooted at [`default_log_directory`].
    pub fn default_location() -> Self {
        Self::new(FileWriterConfig::default())
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// File of the current session, once opened
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn config(&self) -> &FileWriterConfig {
        &self.config
    }

    /// Whether the output file is open; a writer that failed to initialize
    /// keeps accepting entries but discards them.
    pub fn is_functional(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Entries waiting for the worker
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Create the directory and open a fresh `log_<date>_<time>.txt`.
    ///
    /// Never truncates: if the name already exists a numeric suffix is added.
    fn open_session_file(&self) -> Result<(PathBuf, BufWriter<File>)> {
        let dir = &self.config.directory;
        fs::create_dir_all(dir).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                format!("Failed to create directory '{}'", dir.display()),
                e,
            )
        })?;

        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        // Continue after the newest name for this stamp so a name removed by
        // retention is never handed to a later session
        let first = highest_session_suffix(dir, &stamp).map_or(0, |n| n + 1);
        for attempt in first..first + MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}{}{}", LOG_FILE_PREFIX, stamp, LOG_FILE_EXTENSION)
            } else {
                format!("{}{}_{:03}{}", LOG_FILE_PREFIX, stamp, attempt, LOG_FILE_EXTENSION)
            };
            let path = dir.join(name);

            match OpenOptions::new().create_new(true).append(true).open(&path) {
                Ok(file) => return Ok((path, BufWriter::new(file))),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(LoggerError::file_writer(
                        path.display().to_string(),
                        format!("Failed to open: {}", e),
                    ))
                }
            }
        }

        Err(LoggerError::file_writer(
            dir.display().to_string(),
            format!("No free log file name for {}", stamp),
        ))
    }

    fn spawn_worker(&mut self) -> Result<()> {
        let receiver = self.receiver.clone();
        let sink = Arc::clone(&self.sink);
        let cancelled = Arc::clone(&self.cancelled);
        let idle = self.config.idle_interval;

        let handle = thread::Builder::new()
            .name("file-log-writer".to_string())
            .spawn(move || run_worker(receiver, sink, cancelled, idle))
            .map_err(|e| LoggerError::WorkerSpawn(e.to_string()))?;

        self.worker = Some(handle);
        Ok(())
    }

    /// Wait up to the configured timeout for the worker to exit.
    ///
    /// Returns `false` if it was still running when the timeout expired; the
    /// thread is then left detached.
    fn wait_for_worker(&mut self) -> bool {
        let Some(handle) = self.worker.take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(payload) = handle.join() {
                    diagnostics::report_error(
                        "file",
                        &LoggerError::writer_panicked(
                            "file",
                            diagnostics::panic_message(payload.as_ref()),
                        ),
                    );
                }
                return true;
            }

            if start.elapsed() >= self.config.shutdown_timeout {
                return false;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Write whatever is still queued, marked as a shutdown flush, then close.
    fn force_drain_and_close(&mut self) -> Result<()> {
        let Some(mut guard) = self.sink.try_lock_for(self.config.shutdown_timeout) else {
            diagnostics::report_warning(
                "file",
                "output stream still held by the worker; queued entries were not flushed",
            );
            return Ok(());
        };

        let mut result = Ok(());
        for entry in self.receiver.try_iter() {
            let Some(writer) = guard.as_mut() else {
                continue;
            };
            if let Err(e) = writeln!(writer, "{}{}", SHUTDOWN_FLUSH_MARKER, format_file_line(&entry)) {
                result = Err(LoggerError::io_operation(
                    "writing shutdown flush",
                    self.path_for_errors(),
                    e,
                ));
            }
        }

        if let Some(mut writer) = guard.take() {
            if let Err(e) = writer.flush() {
                result = Err(LoggerError::io_operation(
                    "closing log file",
                    self.path_for_errors(),
                    e,
                ));
            }
        }

        result
    }

    fn path_for_errors(&self) -> String {
        self.current_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| self.config.directory.display().to_string())
    }
}

impl LogWriter for FileWriter {
    /// Open the session file, start the worker and apply retention.
    ///
    /// On a directory or file failure the worker still starts, with no output
    /// stream, and the error is returned.
    fn initialize(&mut self) -> Result<()> {
        if self.state != WriterState::Uninitialized {
            return Ok(());
        }

        let mut result = match self.open_session_file() {
            Ok((path, writer)) => {
                self.current_path = Some(path);
                *self.sink.lock() = Some(writer);
                Ok(())
            }
            Err(e) => Err(e),
        };

        if let Err(e) = self.spawn_worker() {
            result = result.and(Err(e));
        }
        self.state = WriterState::Running;

        if self.config.directory.is_dir() {
            if let Err(e) = enforce_retention(&self.config.directory, self.config.max_files) {
                diagnostics::report_error("file", &e);
            }
        }

        result
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        if self.state == WriterState::Closed {
            return Ok(());
        }
        // Unbounded, and the receiver lives as long as `self`
        let _ = self.sender.send(entry.clone());
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.state == WriterState::Closed {
            return Ok(());
        }

        self.state = WriterState::Draining;
        self.cancelled.store(true, Ordering::Release);

        if !self.wait_for_worker() {
            diagnostics::report_warning(
                "file",
                &format!(
                    "worker did not stop within {:?}; draining remaining entries",
                    self.config.shutdown_timeout
                ),
            );
        }

        let result = self.force_drain_and_close();
        self.state = WriterState::Closed;
        result
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if self.state != WriterState::Closed {
            if let Err(e) = self.shutdown() {
                diagnostics::report_error("file", &e);
            }
        }
    }
}

/// Worker loop: block for entries, drain everything queued, flush once per pass.
fn run_worker(
    receiver: Receiver<LogEntry>,
    sink: SharedSink,
    cancelled: Arc<AtomicBool>,
    idle: Duration,
) {
    while !cancelled.load(Ordering::Acquire) {
        match receiver.recv_timeout(idle) {
            Ok(first) => {
                // Only what is queued now; later arrivals wait for the next pass
                let queued = receiver.len();
                let mut guard = sink.lock();
                let mut wrote_any = false;

                for entry in std::iter::once(first).chain(receiver.try_iter().take(queued)) {
                    // No stream: the writer failed to initialize, entries are dropped
                    let Some(writer) = guard.as_mut() else {
                        continue;
                    };
                    match writeln!(writer, "{}", format_file_line(&entry)) {
                        Ok(()) => wrote_any = true,
                        Err(e) => diagnostics::report_error(
                            "file",
                            &LoggerError::io_operation("writing log entry", "append failed", e),
                        ),
                    }
                }

                if wrote_any {
                    if let Some(writer) = guard.as_mut() {
                        if let Err(e) = writer.flush() {
                            diagnostics::report_error(
                                "file",
                                &LoggerError::io_operation("flushing log file", "flush failed", e),
                            );
                        }
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
