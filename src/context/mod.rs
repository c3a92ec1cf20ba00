//! Channel-bound logging facades

pub mod combat;
pub mod context_logger;

pub use combat::CombatLogger;
pub use context_logger::ContextLogger;
