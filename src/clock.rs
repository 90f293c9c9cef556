//! Wall clock and duration measurement
//!
//! The build stamps layers with `built_at` and reports how long delivery
//! took. Both go through [`Clock`] so tests can pin the current time.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

type NowFn = dyn Fn() -> DateTime<Utc> + Send + Sync;

/// Source of the current time
#[derive(Clone)]
pub struct Clock {
    now: Arc<NowFn>,
}

impl Clock {
    /// Create a clock backed by a custom time source
    pub fn new(now: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self { now: Arc::new(now) }
    }

    /// Current time
    pub fn now(&self) -> DateTime<Utc> {
        (self.now)()
    }

    /// Current time as a sortable, UTC-anchored RFC 3339 stamp
    pub fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }

    /// Run an operation to completion and report how long it took
    pub async fn measure<F, Fut, T>(&self, operation: F) -> (Duration, T)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let start = Instant::now();
        let output = operation().await;
        (start.elapsed(), output)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Utc::now)
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

/// Format a time with nanosecond precision and a `Z` suffix
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Round a duration to whole milliseconds for display
pub fn round_millis(duration: Duration) -> Duration {
    let millis = (duration.as_nanos() + 500_000) / 1_000_000;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_pinned_time() {
        let pinned = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let clock = Clock::new(move || pinned);

        assert_eq!(clock.now(), pinned);
        assert_eq!(clock.timestamp(), "2024-01-15T10:00:00.000000000Z");
    }

    #[test]
    fn timestamps_round_trip_and_sort() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 15, 9, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();

        let a = format_timestamp(earlier);
        let b = format_timestamp(later);
        assert!(a < b);

        let parsed = DateTime::parse_from_rfc3339(&b).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), later);
    }

    #[tokio::test]
    async fn measure_returns_operation_output() {
        let clock = Clock::default();
        let (duration, value) = clock.measure(|| async { 42 }).await;

        assert_eq!(value, 42);
        assert!(duration < Duration::from_secs(5));
    }

    #[test]
    fn round_millis_rounds_to_nearest() {
        assert_eq!(
            round_millis(Duration::from_micros(1_499)),
            Duration::from_millis(1)
        );
        assert_eq!(
            round_millis(Duration::from_micros(1_500)),
            Duration::from_millis(2)
        );
    }
}
