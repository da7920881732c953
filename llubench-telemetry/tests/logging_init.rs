//! Installs the global subscriber, so it runs in its own test binary where
//! no `#[traced_test]` subscriber competes for the global slot.

use llubench_telemetry::EventLogger;

#[test]
fn init_is_idempotent() {
    EventLogger::init();
    EventLogger::init();
    tracing::info!("still logging");
    assert!(tracing::dispatcher::has_been_set());
}
