//! Combat logger example
//!
//! Shows how a domain logger chooses levels on top of a channel-bound logger.
//!
//! Run with: cargo run --example combat

use channel_logger::prelude::*;
use std::sync::Arc;

fn main() {
    println!("--- Starting Combat Logger Example ---");

    let dispatcher = Arc::new(Dispatcher::new());
    dispatcher.initialize(&LoggerSettings::new().with_min_log_level(3));

    let combat = CombatLogger::new(Arc::clone(&dispatcher));
    let ui = ContextLogger::new(Arc::clone(&dispatcher), "UI");

    combat.log_attack("Hero", "Slime", 15, false);
    combat.log_attack("Hero", "Boss", 999, true);
    combat.log_attack("Skeleton", "Hero", 0, false);
    combat.log_heal("Cleric", "Hero", 50);

    ui.info("Combat Window opened.");

    dispatcher.shutdown();
    println!("--- End of Combat Logger Example ---");
}
