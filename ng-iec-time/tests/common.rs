use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Once;
use tracing::Level;

/// Global one-time tracing initialization guard for time tag tests.
static INIT_TRACING: Once = Once::new();

/// Installs a compact `tracing` subscriber so codec trace/debug events show
/// up when running with `--nocapture`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

/// Builds a UTC instant with millisecond precision.
pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap() + Duration::milliseconds(ms)
}
