use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch: the Unix epoch, Thursday, January 1, 1970 00:00:00 UTC.
///
/// IDs generated against this epoch decode to plain Unix milliseconds.
pub const DEFAULT_EPOCH: Duration = Duration::ZERO;

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A source of wall-clock time in milliseconds relative to an epoch.
///
/// This abstraction lets the generator run against the real system clock or a
/// mocked time source in tests. Readings are signed so that a clock set
/// before the epoch is reported as such instead of wrapping.
///
/// # Example
///
/// ```
/// use shardflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> i64 {
        (**self).current_millis()
    }
}

/// Wall-clock time source backed by [`SystemTime`].
///
/// Unlike a monotonic timer, this clock follows external adjustments (NTP
/// steps, manual changes). The generator relies on that to detect a clock
/// that moved backwards and refuse to issue IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch_millis: i64,
}

impl Default for SystemClock {
    /// Constructs a system clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock whose readings are relative to `epoch`, given as a
    /// [`Duration`] since 1970-01-01 UTC.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: duration_to_millis(epoch),
        }
    }

    /// The configured epoch in Unix milliseconds.
    pub const fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        let unix_millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => duration_to_millis(elapsed),
            Err(before) => -duration_to_millis(before.duration()),
        };
        unix_millis.saturating_sub(self.epoch_millis)
    }
}

pub(crate) fn duration_to_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_unix_time() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        let now = SystemClock::default().current_millis();
        let after = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;

        assert!(before <= now && now <= after);
    }

    #[test]
    fn system_clock_subtracts_custom_epoch() {
        let clock = SystemClock::with_epoch(CUSTOM_EPOCH);
        let unix = SystemClock::default().current_millis();
        let relative = clock.current_millis();

        assert_eq!(clock.epoch_millis(), 1_735_689_600_000);
        // Two reads a few microseconds apart; allow for a tick in between.
        let diff = unix - relative - clock.epoch_millis();
        assert!((-1..=1).contains(&diff), "diff {diff}");
    }
}
