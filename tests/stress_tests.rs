//! Stress tests for concurrent dispatch
//!
//! These tests verify:
//! - No entry is lost or duplicated when many threads log at once
//! - Each producer's entries keep their relative order in the file
//! - Mute/unmute churn on one thread is safe while others log

use channel_logger::prelude::*;
use channel_logger::writers::SHUTDOWN_FLUSH_MARKER;
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

#[test]
fn test_concurrent_producers_lose_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dispatcher = Arc::new(
        Dispatcher::builder()
            .writer(FileWriter::new(
                FileWriterConfig::new(temp_dir.path()).with_idle_interval(Duration::from_millis(5)),
            ))
            .build(),
    );

    let mut handles = vec![];
    for thread_id in 0..THREADS {
        let dispatcher = Arc::clone(&dispatcher);
        handles.push(std::thread::spawn(move || {
            let channel = format!("Worker{}", thread_id);
            for i in 0..PER_THREAD {
                dispatcher.info(&channel, format!("{}", i));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(dispatcher.shutdown());

    let files: Vec<_> = fs::read_dir(temp_dir.path())
        .expect("Failed to read log dir")
        .map(|e| e.expect("Bad dir entry").path())
        .collect();
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).expect("Failed to read log file");

    // Per-channel sequence numbers must arrive in order with no gaps
    let mut next_expected: HashMap<String, usize> = HashMap::new();
    for line in content.lines() {
        let line = line.trim_start_matches(SHUTDOWN_FLUSH_MARKER);
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 4, "Malformed line: {}", line);

        let seq: usize = fields[3].parse().expect("sequence number");
        let expected = next_expected.entry(fields[2].to_string()).or_insert(0);
        assert_eq!(seq, *expected, "Out of order entry on {}", fields[2]);
        *expected += 1;
    }

    assert_eq!(next_expected.len(), THREADS);
    assert!(next_expected.values().all(|&n| n == PER_THREAD));
    assert_eq!(dispatcher.metrics().dispatched_count(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_mute_churn_while_logging() {
    #[derive(Default)]
    struct Counting {
        physics: AtomicUsize,
        other: AtomicUsize,
    }

    struct CountingWriter(Arc<Counting>);

    impl LogWriter for CountingWriter {
        fn initialize(&mut self) -> Result<()> {
            Ok(())
        }

        fn write(&self, entry: &LogEntry) -> Result<()> {
            if entry.channel().eq_ignore_ascii_case("physics") {
                self.0.physics.fetch_add(1, Ordering::Relaxed);
            } else {
                self.0.other.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        }

        fn shutdown(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    let counts = Arc::new(Counting::default());
    let dispatcher = Arc::new(
        Dispatcher::builder()
            .writer(CountingWriter(Arc::clone(&counts)))
            .build(),
    );

    let toggler = {
        let dispatcher = Arc::clone(&dispatcher);
        std::thread::spawn(move || {
            for i in 0..1000 {
                if i % 2 == 0 {
                    dispatcher.mute("Physics");
                } else {
                    dispatcher.unmute("PHYSICS");
                }
            }
        })
    };

    let loggers: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    dispatcher.info("physics", "step");
                    dispatcher.info("UI", "frame");
                }
            })
        })
        .collect();

    toggler.join().expect("Toggler panicked");
    for handle in loggers {
        handle.join().expect("Logger panicked");
    }

    // The final toggle unmutes, and nothing on other channels is ever filtered
    assert!(!dispatcher.is_muted("physics"));
    assert_eq!(counts.other.load(Ordering::Relaxed), 4000);
    assert!(counts.physics.load(Ordering::Relaxed) <= 4000);
    assert_eq!(
        dispatcher.metrics().dispatched_count() + dispatcher.metrics().filtered_count(),
        8000
    );
}
