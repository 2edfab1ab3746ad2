use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// A wall-clock time source backed by [`SystemTime`].
///
/// Unlike a monotonic timer, this clock follows external adjustments (NTP
/// steps, manual changes). Generators detect a backwards step and report it as
/// [`Error::ClockRegression`] instead of issuing an ID that could collide.
///
/// A system clock set before 1970 reads as `0`.
///
/// [`Error::ClockRegression`]: crate::generator::Error::ClockRegression
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })
    }
}
