use core::fmt;

/// A result type defaulting to the generator [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `linkflake` can emit.
///
/// The clock-related variants are fatal for the call that observed them: the
/// generator refuses to synthesize an ID rather than risk reuse or an ordering
/// violation, and leaves its state untouched. Callers decide whether to abort
/// the request, alert, or shut down.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The wall clock moved backwards relative to the last issued ID.
    ///
    /// Both values are milliseconds since the generator's epoch.
    ClockRegression {
        /// Timestamp of the last issued ID.
        last: u64,
        /// Timestamp observed by the failing call.
        now: u64,
    },

    /// The timestamp no longer fits the 41-bit field; the configured epoch
    /// has been exhausted.
    TimestampOverflow {
        /// Milliseconds since the generator's epoch.
        timestamp: u64,
    },

    /// The wall clock reads earlier than the generator's epoch.
    ClockBeforeEpoch {
        /// Milliseconds since the Unix epoch.
        now: u64,
        /// The configured epoch, in milliseconds since the Unix epoch.
        epoch: u64,
    },

    /// A datacenter ID outside `0..=31` was supplied.
    InvalidDatacenterId {
        /// The rejected value.
        id: u8,
    },

    /// A machine ID outside `0..=31` was supplied.
    InvalidMachineId {
        /// The rejected value.
        id: u8,
    },
}

impl Error {
    /// Returns `true` for errors raised while generating an ID, as opposed to
    /// while configuring a generator.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ClockRegression { .. }
                | Self::TimestampOverflow { .. }
                | Self::ClockBeforeEpoch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockRegression { last, now } => write!(
                f,
                "clock moved backwards, refusing to generate id for {} milliseconds",
                last.saturating_sub(*now)
            ),
            Self::TimestampOverflow { timestamp } => write!(
                f,
                "timestamp {timestamp} exceeds the maximum of {} milliseconds from epoch",
                crate::SnowflakeId::max_timestamp()
            ),
            Self::ClockBeforeEpoch { now, epoch } => {
                write!(f, "clock reads {now} which is before the epoch {epoch}")
            }
            Self::InvalidDatacenterId { id } => write!(
                f,
                "datacenter id {id} is out of range (0..={})",
                crate::NodeIdentity::MAX_DATACENTER_ID
            ),
            Self::InvalidMachineId { id } => write!(
                f,
                "machine id {id} is out of range (0..={})",
                crate::NodeIdentity::MAX_MACHINE_ID
            ),
        }
    }
}

impl core::error::Error for Error {}
