use std::time::Duration;

// ── Store defaults ─────────────────────────────────────────────────

pub const DEFAULT_DATABASE: &str = "warpgate";
pub const DEFAULT_COLLECTION: &str = "alerts";

// ── Purge defaults ─────────────────────────────────────────────────

/// Seconds an alert record may sit in the store before a sweep
/// reclaims it. Metagame alerts run 90 minutes at most.
pub const DEFAULT_RETENTION_SECS: u64 = 5400;

/// Records removed per sweep iteration.
pub const DEFAULT_PURGE_BATCH_SIZE: usize = 30;

/// Seconds between periodic purge sweeps.
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 300;

// ── Channel capacities ─────────────────────────────────────────────

pub const EVENT_CHANNEL_CAPACITY: usize = 1_000;

// ── Timeouts ───────────────────────────────────────────────────────

pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
