//! Combat event logger
//!
//! Picks the level from what happened: a miss is only interesting while
//! debugging, a critical hit deserves attention, anything else is routine.

use super::context_logger::ContextLogger;
use crate::core::Dispatcher;
use std::sync::Arc;

pub const COMBAT_CHANNEL: &str = "Combat";

#[derive(Debug, Clone)]
pub struct CombatLogger {
    context: ContextLogger,
}

impl CombatLogger {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            context: ContextLogger::new(dispatcher, COMBAT_CHANNEL),
        }
    }

    pub fn context(&self) -> &ContextLogger {
        &self.context
    }

    /// Critical hits log at warning, zero-damage attacks at debug, the rest at info.
    pub fn log_attack(&self, attacker: &str, target: &str, damage: u32, is_critical: bool) {
        if is_critical {
            self.context.warning(format!(
                "{} attacks {} for {} DMG (CRITICAL HIT!)",
                attacker, target, damage
            ));
        } else if damage == 0 {
            self.context.debug(format!("{} missed {}!", attacker, target));
        } else {
            self.context
                .info(format!("{} attacks {} for {} DMG", attacker, target, damage));
        }
    }

    pub fn log_heal(&self, healer: &str, target: &str, amount: u32) {
        self.context
            .info(format!("{} heals {} for {} HP.", healer, target, amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEntry, LogLevel, LogWriter, Result};
    use parking_lot::Mutex;

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

    fn combat_logger() -> (CombatLogger, Recorder, Arc<Dispatcher>) {
        let recorder = Recorder::default();
        let dispatcher = Arc::new(Dispatcher::builder().writer(recorder.clone()).build());
        dispatcher.set_min_level(LogLevel::Debug);
        (CombatLogger::new(Arc::clone(&dispatcher)), recorder, dispatcher)
    }

    #[test]
    fn test_ordinary_attack_is_info() {
        let (combat, recorder, _dispatcher) = combat_logger();
        combat.log_attack("Hero", "Slime", 15, false);

        let entries = recorder.0.lock();
        assert_eq!(entries[0].level(), LogLevel::Info);
        assert_eq!(entries[0].channel(), "Combat");
        assert_eq!(entries[0].message(), "Hero attacks Slime for 15 DMG");
    }

    #[test]
    fn test_critical_attack_is_warning() {
        let (combat, recorder, _dispatcher) = combat_logger();
        combat.log_attack("Hero", "Boss", 999, true);

        let entries = recorder.0.lock();
        assert_eq!(entries[0].level(), LogLevel::Warning);
        assert!(entries[0].message().ends_with("(CRITICAL HIT!)"));
        assert_eq!(entries[0].message(), "Hero attacks Boss for 999 DMG (CRITICAL HIT!)");
    }

    #[test]
    fn test_miss_is_debug() {
        let (combat, recorder, _dispatcher) = combat_logger();
        combat.log_attack("Skeleton", "Hero", 0, false);

        let entries = recorder.0.lock();
        assert_eq!(entries[0].level(), LogLevel::Debug);
        assert_eq!(entries[0].message(), "Skeleton missed Hero!");
    }

    #[test]
    fn test_critical_miss_still_warns() {
        let (combat, recorder, _dispatcher) = combat_logger();
        combat.log_attack("Hero", "Ghost", 0, true);

        assert_eq!(recorder.0.lock()[0].level(), LogLevel::Warning);
    }

    #[test]
    fn test_miss_hidden_at_default_level() {
        let (combat, recorder, dispatcher) = combat_logger();
        dispatcher.set_min_level(LogLevel::Info);
        combat.log_attack("Skeleton", "Hero", 0, false);

        assert!(recorder.0.lock().is_empty());
    }

    #[test]
    fn test_heal_message() {
        let (combat, recorder, _dispatcher) = combat_logger();
        combat.log_heal("Cleric", "Hero", 50);

        let entries = recorder.0.lock();
        assert_eq!(entries[0].level(), LogLevel::Info);
        assert_eq!(entries[0].message(), "Cleric heals Hero for 50 HP.");
    }
}
