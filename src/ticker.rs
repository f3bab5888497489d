use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Floor for the poll timeout so a zero tick never spins the loop
const MIN_TICK_MS: u64 = 10;

/// Get tick duration for a configured interval
pub fn tick_duration(tick_ms: u64) -> Duration {
    Duration::from_millis(tick_ms.max(MIN_TICK_MS))
}

/// How long to wait for input: the tick, or less if a wake-up is due sooner
pub fn poll_timeout(tick: Duration, until_deadline: Option<chrono::Duration>) -> Duration {
    let Some(until) = until_deadline else {
        return tick;
    };
    let until = until.to_std().unwrap_or(Duration::ZERO);
    tick.min(until).max(Duration::from_millis(MIN_TICK_MS))
}
