//! Diagnostic fallback channel
//!
//! Internal failures of the logger itself are never raised to the code that
//! logged. They are written to stderr instead, which is always available even
//! when every configured writer is broken.

use super::error::LoggerError;

/// Report an internal failure of `component`.
pub(crate) fn report_error(component: &str, err: &LoggerError) {
    eprintln!("[LOGGER ERROR] [{}] {}", component, err);
}

/// Report a non-fatal condition, such as a timed-out worker.
pub(crate) fn report_warning(component: &str, message: &str) {
    eprintln!("[LOGGER WARNING] [{}] {}", component, message);
}

/// Render a `catch_unwind` payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
