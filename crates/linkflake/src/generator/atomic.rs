use core::time::Duration;

use portable_atomic::{AtomicU64, Ordering};

use crate::{
    generator::{IdentifierClock, Poll, Result, Step, advance, epoch_millis},
    id::{NodeIdentity, SnowflakeId},
    time::TimeSource,
};

/// A lock-free ID generator suitable for multi-threaded environments.
///
/// The generation state is the raw value of the last issued ID, stored in an
/// [`AtomicU64`]. Each attempt loads the state, reads the clock, computes the
/// successor and publishes it with a single compare-and-swap. A lost race
/// surfaces as [`Poll::Pending`] with `yield_for == 0`, asking for an
/// immediate retry.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair access across threads
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Throughput matters more than fairness
///
/// ## See Also
/// - [`LockIdentifierClock`]
///
/// [`LockIdentifierClock`]: crate::generator::LockIdentifierClock
pub struct AtomicIdentifierClock<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    node: NodeIdentity,
    epoch: u64,
    time: T,
}

impl<T> AtomicIdentifierClock<T>
where
    T: TimeSource,
{
    /// Creates a new [`AtomicIdentifierClock`] for the given node.
    ///
    /// # Example
    /// ```
    /// use linkflake::{
    ///     AtomicIdentifierClock, IdentifierClock, NodeIdentity, SystemClock, CUSTOM_EPOCH,
    /// };
    ///
    /// let node = NodeIdentity::new(4, 2).unwrap();
    /// let generator = AtomicIdentifierClock::new(node, CUSTOM_EPOCH, SystemClock);
    ///
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.node(), node);
    /// ```
    pub fn new(node: NodeIdentity, epoch: Duration, time: T) -> Self {
        Self::from_components(node, epoch, 0, 0, time)
    }

    /// Creates a generator from explicit state. `timestamp` is in milliseconds
    /// since `epoch`.
    pub fn from_components(
        node: NodeIdentity,
        epoch: Duration,
        timestamp: u64,
        sequence: u64,
        time: T,
    ) -> Self {
        let initial = SnowflakeId::from_node(timestamp, node, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial.to_raw())),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial.to_raw()),
            node,
            epoch: epoch_millis(epoch),
            time,
        }
    }

    /// Attempts to generate the next available ID.
    ///
    /// # Errors
    ///
    /// See [`IdentifierClock::try_poll_id`].
    pub fn try_poll_id(&self) -> Result<Poll> {
        // Load before reading the clock: any timestamp visible here was read
        // by its writer before our own clock read.
        let current_raw = self.state.load(Ordering::Acquire);
        let now = self.time.current_millis();

        let next = match advance(SnowflakeId::from_raw(current_raw), now, self.epoch)? {
            Step::Issue(id) => id,
            Step::Exhausted => return Ok(Poll::Pending { yield_for: 1 }),
        };

        if self
            .state
            .compare_exchange(
                current_raw,
                next.to_raw(),
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            Ok(Poll::Ready { id: next })
        } else {
            // Another thread won the race; retry immediately.
            Ok(Poll::Pending { yield_for: 0 })
        }
    }
}

impl<T> IdentifierClock for AtomicIdentifierClock<T>
where
    T: TimeSource,
{
    fn node(&self) -> NodeIdentity {
        self.node
    }

    fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch)
    }

    fn try_poll_id(&self) -> Result<Poll> {
        self.try_poll_id()
    }
}
