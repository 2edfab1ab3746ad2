use core::{cmp::Ordering, time::Duration};
use std::sync::Arc;

use crate::{
    generator::{Error, Poll, Result},
    id::{NodeIdentity, SnowflakeId},
};

/// A minimal interface for generating monotonically increasing
/// [`SnowflakeId`]s for a fixed [`NodeIdentity`].
///
/// Implementations own the generation state (last issued timestamp and
/// intra-millisecond sequence) and mutate it in a single critical section per
/// call. That critical section never performs I/O.
pub trait IdentifierClock {
    /// The node identity embedded into every generated ID.
    fn node(&self) -> NodeIdentity;

    /// The epoch subtracted from wall-clock time, as a [`Duration`] since
    /// 1970-01-01 UTC.
    fn epoch(&self) -> Duration;

    /// Attempts to generate the next ID in one atomic step.
    ///
    /// Returns [`Poll::Pending`] when the sequence for the current millisecond
    /// is exhausted; retry once the clock has advanced.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued ID
    /// - [`Error::TimestampOverflow`] if the timestamp no longer fits 41 bits
    /// - [`Error::ClockBeforeEpoch`] if the clock reads earlier than the epoch
    fn try_poll_id(&self) -> Result<Poll>;

    /// Generates the next ID, spinning until the clock advances whenever the
    /// current millisecond is exhausted.
    ///
    /// There is no timeout: the wait is bounded only by the clock itself.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`IdentifierClock::try_poll_id`].
    fn next_id(&self) -> Result<SnowflakeId> {
        loop {
            match self.try_poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for: 0 } => core::hint::spin_loop(),
                Poll::Pending { .. } => std::thread::yield_now(),
            }
        }
    }
}

macro_rules! forward_identifier_clock {
    ($($ptr:ty),*) => {
        $(
            impl<G> IdentifierClock for $ptr
            where
                G: IdentifierClock + ?Sized,
            {
                fn node(&self) -> NodeIdentity {
                    (**self).node()
                }

                fn epoch(&self) -> Duration {
                    (**self).epoch()
                }

                fn try_poll_id(&self) -> Result<Poll> {
                    (**self).try_poll_id()
                }
            }
        )*
    };
}

forward_identifier_clock!(&G, Box<G>, Arc<G>);

/// Outcome of advancing the generation state by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Issue this ID and store it as the new state.
    Issue(SnowflakeId),
    /// The sequence for the current millisecond is used up.
    Exhausted,
}

/// Computes the successor of `last` for a wall-clock reading of `now`
/// (milliseconds since the Unix epoch).
///
/// Shared by every generator so the lock-based and lock-free variants issue
/// exactly the same sequence of IDs.
#[inline]
pub(crate) fn advance(last: SnowflakeId, now: u64, epoch: u64) -> Result<Step> {
    let Some(ts) = now.checked_sub(epoch) else {
        return Err(cold_before_epoch(now, epoch));
    };

    let last_ts = last.timestamp();
    match ts.cmp(&last_ts) {
        Ordering::Equal => {
            if last.has_sequence_room() {
                Ok(Step::Issue(last.increment_sequence()))
            } else {
                Ok(Step::Exhausted)
            }
        }
        Ordering::Greater => {
            if ts > SnowflakeId::max_timestamp() {
                return Err(Error::TimestampOverflow { timestamp: ts });
            }
            Ok(Step::Issue(last.rollover_to_timestamp(ts)))
        }
        Ordering::Less => Err(cold_clock_behind(last_ts, ts)),
    }
}

#[cold]
#[inline(never)]
fn cold_clock_behind(last: u64, now: u64) -> Error {
    Error::ClockRegression { last, now }
}

#[cold]
#[inline(never)]
fn cold_before_epoch(now: u64, epoch: u64) -> Error {
    Error::ClockBeforeEpoch { now, epoch }
}

/// Converts an epoch to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn epoch_millis(epoch: Duration) -> u64 {
    u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX)
}
