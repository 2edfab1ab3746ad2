use core::time::Duration;

use parking_lot::Mutex;

use crate::{
    generator::{IdentifierClock, Poll, Result, Step, advance, epoch_millis},
    id::{NodeIdentity, SnowflakeId},
    time::TimeSource,
};

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// The generation state (the last issued ID, which carries the last timestamp
/// and sequence) sits behind a [`parking_lot::Mutex`]. Each call reads the
/// clock and advances the state while holding the lock, so concurrent callers
/// are fully serialized and can never observe the same `(timestamp,
/// sequence)` pair.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
/// - ✅ The clock is read inside the critical section
///
/// ## See Also
/// - [`AtomicIdentifierClock`]
///
/// [`AtomicIdentifierClock`]: crate::generator::AtomicIdentifierClock
pub struct LockIdentifierClock<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<SnowflakeId>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<SnowflakeId>,
    node: NodeIdentity,
    epoch: u64,
    time: T,
}

impl<T> LockIdentifierClock<T>
where
    T: TimeSource,
{
    /// Creates a new [`LockIdentifierClock`] for the given node.
    ///
    /// # Parameters
    ///
    /// - `node`: The datacenter/machine pair encoded into every generated ID.
    /// - `epoch`: The origin subtracted from wall-clock time, as a
    ///   [`Duration`] since 1970-01-01 UTC.
    /// - `time`: A [`TimeSource`] implementation (e.g., [`SystemClock`]).
    ///
    /// # Example
    /// ```
    /// use linkflake::{
    ///     IdentifierClock, LockIdentifierClock, NodeIdentity, SystemClock, TWITTER_EPOCH,
    /// };
    ///
    /// let node = NodeIdentity::new(1, 1).unwrap();
    /// let generator = LockIdentifierClock::new(node, TWITTER_EPOCH, SystemClock);
    ///
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert!(a < b);
    /// ```
    ///
    /// [`SystemClock`]: crate::time::SystemClock
    pub fn new(node: NodeIdentity, epoch: Duration, time: T) -> Self {
        Self::from_components(node, epoch, 0, 0, time)
    }

    /// Creates a generator from explicit state.
    ///
    /// This constructor is primarily useful for restoring state from
    /// persistent storage or controlling the starting point of the generator
    /// manually. `timestamp` is in milliseconds since `epoch`.
    pub fn from_components(
        node: NodeIdentity,
        epoch: Duration,
        timestamp: u64,
        sequence: u64,
        time: T,
    ) -> Self {
        let id = SnowflakeId::from_node(timestamp, node, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(id)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(id),
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
    ///
    /// # Example
    /// ```
    /// use linkflake::{LockIdentifierClock, NodeIdentity, Poll, SystemClock, TWITTER_EPOCH};
    ///
    /// let node = NodeIdentity::new(0, 3).unwrap();
    /// let generator = LockIdentifierClock::new(node, TWITTER_EPOCH, SystemClock);
    ///
    /// let id = loop {
    ///     match generator.try_poll_id() {
    ///         Ok(Poll::Ready { id }) => break id,
    ///         Ok(Poll::Pending { .. }) => std::thread::yield_now(),
    ///         Err(e) => panic!("generator error: {e}"),
    ///     }
    /// };
    /// assert_eq!(id.machine_id(), 3);
    /// ```
    pub fn try_poll_id(&self) -> Result<Poll> {
        let mut last = self.state.lock();
        let now = self.time.current_millis();

        match advance(*last, now, self.epoch)? {
            Step::Issue(id) => {
                *last = id;
                Ok(Poll::Ready { id })
            }
            Step::Exhausted => Ok(Poll::Pending { yield_for: 1 }),
        }
    }
}

impl<T> IdentifierClock for LockIdentifierClock<T>
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
