//! Console writer implementation

use crate::core::{LogEntry, LogLevel, LogWriter, Result};
use colored::Colorize;

pub struct ConsoleWriter {
    use_colors: bool,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Render `entry` as `HH:MM:SS [LEVEL] [channel] message`, with the error
    /// description on a following line when present.
    pub fn format_line(&self, entry: &LogEntry) -> String {
        let time = entry.timestamp().format("%H:%M:%S").to_string();
        let level = format!("[{}]", entry.level());
        let channel = format!("[{}]", entry.channel());

        let mut line = if self.use_colors {
            format!(
                "{} {} {} {}",
                time.bright_black(),
                level.color(entry.level().color_code()).bold(),
                channel.white(),
                entry.message()
            )
        } else {
            format!("{} {} {} {}", time, level, channel, entry.message())
        };

        if let Some(error) = entry.error() {
            line.push('\n');
            if self.use_colors {
                line.push_str(&error.to_string().red().to_string());
            } else {
                line.push_str(&error.to_string());
            }
        }

        line
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogWriter for ConsoleWriter {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        let output = self.format_line(entry);

        // Route Error level to stderr, others to stdout
        match entry.level() {
            LogLevel::Error => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
