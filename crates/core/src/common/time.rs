use chrono::{DateTime, Utc};
use std::sync::RwLock;

/// # Summary
/// Clock port. Adapters that compute request windows read "now" through this
/// trait so tests can pin it.
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// # Summary
/// Wall clock backed by the operating system.
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// Settable clock for tests.
///
/// # Invariants
/// - A poisoned lock still yields the last written time.
pub struct FakeClockProvider {
    current_time: RwLock<DateTime<Utc>>,
}

impl FakeClockProvider {
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self {
            current_time: RwLock::new(initial_time),
        }
    }

    pub fn set_time(&self, new_time: DateTime<Utc>) {
        let mut time = self
            .current_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *time = new_time;
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        *self
            .current_time
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fake_clock_is_settable() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let clock = FakeClockProvider::new(t0);
        assert_eq!(clock.now(), t0);

        let t1 = t0 + chrono::Duration::hours(1);
        clock.set_time(t1);
        assert_eq!(clock.now(), t1);
    }
}
