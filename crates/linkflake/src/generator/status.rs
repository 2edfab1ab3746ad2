use crate::id::SnowflakeId;

/// Represents the result of a single generation attempt.
///
/// This type models the outcome of [`IdentifierClock::try_poll_id`]:
///
/// - [`Poll::Ready`] indicates a new ID was successfully generated.
/// - [`Poll::Pending`] means the generator cannot produce a new ID until the
///   clock advances, either because the sequence for the current millisecond
///   is exhausted or because a lock-free update lost a race.
///
/// This allows callers to choose their own waiting strategy: spin, yield the
/// thread, or yield to an async scheduler.
///
/// [`IdentifierClock::try_poll_id`]: crate::generator::IdentifierClock::try_poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be generated on this attempt.
    ///
    /// `yield_for` is a wait hint in milliseconds. An exhausted millisecond
    /// reports `1`, the time until the clock can advance. A lost CAS race
    /// reports `0`: retry immediately. [`IdentifierClock::next_id`] spins on
    /// `0` and yields the thread otherwise; async callers may sleep for the
    /// hinted duration.
    ///
    /// [`IdentifierClock::next_id`]: crate::generator::IdentifierClock::next_id
    Pending {
        /// Milliseconds to wait before retrying.
        yield_for: u64,
    },
}
