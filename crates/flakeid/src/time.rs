use std::{
    sync::Arc,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

/// Unix epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: u64 = 0;

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: u64 = 1_288_834_974_657;

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: u64 = 1_735_689_600_000;

/// A source of wall-clock time in **milliseconds since the Unix epoch**.
///
/// Generators call [`TimeSource::current_millis`] on every ID request and
/// compare successive readings to detect millisecond boundaries, so
/// implementations must not cache. A reading lower than a previous one is
/// allowed and is reported by the generator as
/// [`Error::ClockMovedBackwards`].
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
///
/// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// The system wall clock.
///
/// Reads `SystemTime::now()` on every call. Follows NTP and manual
/// adjustments, so it can step backwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A clock set before 1970 reads as 0; the epoch check in the
        // generator rejects it.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// A wall-clock aligned time source that never goes backwards.
///
/// The wall-clock time is captured once at construction and every reading
/// adds the `Instant` elapsed since then. This avoids wall-clock adjustments
/// (e.g., NTP steps) at the cost of drifting away from the system clock on
/// long-running processes.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    start_millis: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock at the current system time.
    pub fn new() -> Self {
        Self::anchored_at(SystemClock.current_millis())
    }

    /// Anchors a new clock so that it reads `unix_millis` right now.
    pub fn anchored_at(unix_millis: u64) -> Self {
        Self {
            start: Instant::now(),
            start_millis: unix_millis,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.start_millis + self.start.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn system_clock_is_after_custom_epoch() {
        assert!(SystemClock.current_millis() > CUSTOM_EPOCH);
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::anchored_at(5_000);
        let mut last = clock.current_millis();
        assert!(last >= 5_000);
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let before = clock.current_millis();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.current_millis() > before);
    }

    #[test]
    fn shared_clocks_delegate() {
        let clock = Arc::new(MonotonicClock::anchored_at(42));
        assert!(clock.current_millis() >= 42);
        assert!((&clock).current_millis() >= 42);
    }
}
