use core::time::Duration;

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**. Generators subtract their
/// own configured epoch, so the same time source can back generators with
/// different epochs.
///
/// # Example
///
/// ```
/// use linkflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T> TimeSource for &T
where
    T: TimeSource + ?Sized,
{
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T> TimeSource for std::sync::Arc<T>
where
    T: TimeSource + ?Sized,
{
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
