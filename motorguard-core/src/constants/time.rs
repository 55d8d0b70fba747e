//! Freshness Timeouts, Cycle Intervals, and Windows
//!
//! All durations are milliseconds to match [`Timestamp`](crate::time::Timestamp).

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1_000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

// ===== FRESHNESS =====

/// Sensor-node silence beyond this is a timeout. The node pushes every few
/// seconds, so 30 s of silence means it is gone, not slow.
pub const NODE_TIMEOUT_MS: u64 = 30 * MS_PER_SECOND;

/// Controller silence beyond this is a timeout. The register poller runs
/// slower than the node push loop, so it gets a longer leash.
pub const CONTROLLER_TIMEOUT_MS: u64 = 60 * MS_PER_SECOND;

/// Fraction of a source's timeout after which it is marked Stale.
pub const STALE_FRACTION: f64 = 2.0 / 3.0;

// ===== CYCLES =====

/// Interval between timeout sweeps.
pub const SWEEP_INTERVAL_MS: u64 = 10 * MS_PER_SECOND;

/// Interval between evaluation cycles.
pub const EVALUATE_INTERVAL_MS: u64 = 15 * MS_PER_SECOND;

// ===== WINDOWS =====

/// Window within which an unacknowledged alert of the same type suppresses
/// a new one.
pub const ALERT_DEDUP_WINDOW_MS: u64 = 30 * MS_PER_MINUTE;

/// Default historical-average lookback.
pub const HISTORY_LOOKBACK_MS: u64 = 24 * MS_PER_HOUR;

/// Widened lookback used when the default window has no rows.
pub const HISTORY_LOOKBACK_WIDE_MS: u64 = 7 * 24 * MS_PER_HOUR;
