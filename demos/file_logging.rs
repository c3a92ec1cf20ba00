//! File logging example
//!
//! Logs to the console and a session file, then prints where the file went.
//!
//! Run with: cargo run --example file_logging

use channel_logger::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Channel Logger - File Logging Example ===\n");

    let settings = LoggerSettings::from_json_str(
        r#"{ "muted_channels": "Physics", "min_log_level": 0, "log_directory": "demo-logs" }"#,
    )?;

    let dispatcher = Arc::new(Dispatcher::new());
    dispatcher.initialize(&settings);

    let save = ContextLogger::new(Arc::clone(&dispatcher), "Save");
    let physics = ContextLogger::new(Arc::clone(&dispatcher), "Physics");

    save.info("Loading slot 1");
    physics.info("This channel is muted and never shows up");
    for i in 1..=5 {
        save.info(format!("Restoring chunk {}/5", i));
    }

    let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "slot_2.sav missing");
    save.error_with("Optional backup could not be read", &missing);

    dispatcher.shutdown();

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'demo-logs' directory for the session file");

    Ok(())
}
