use std::env::var;
use std::time::Duration;

/// BCM 23, physical pin 16
pub const RELAY_PIN: u8 = 23;

/// Five hours
pub const DURATION_SECS: u64 = 5 * 60 * 60;

pub const POLL_INTERVAL_MS: u64 = 1_000;

/// Highest BCM number broken out on the 40-pin header
pub const MAX_HEADER_PIN: u8 = 27;

pub fn relay_pin() -> u8 {
    RELAY_PIN
}

pub fn duration() -> Duration {
    Duration::from_secs(DURATION_SECS)
}

pub fn poll_interval() -> Duration {
    Duration::from_millis(POLL_INTERVAL_MS)
}

/// env_logger filter used when RUST_LOG is unset
pub fn log_filter() -> String {
    var("RUST_LOG").unwrap_or(String::from("info"))
}
