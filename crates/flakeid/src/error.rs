use core::time::Duration;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakeid` can emit.
///
/// Configuration errors ([`Error::InvalidWorkerId`], [`Error::EpochInFuture`],
/// [`Error::EpochTooFarInPast`]) are only produced while building a
/// [`GeneratorConfig`] or a generator. Every other variant is produced per call
/// and leaves the generator state exactly as it was before the call.
///
/// [`GeneratorConfig`]: crate::GeneratorConfig
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The worker ID does not fit in the 10-bit worker field.
    #[error("worker id {worker_id} is out of range (max {max})")]
    InvalidWorkerId {
        /// The rejected worker ID.
        worker_id: u64,
        /// The largest accepted worker ID.
        max: u64,
    },

    /// The configured epoch is later than the clock's current reading.
    ///
    /// Every timestamp delta would be negative, so the generator refuses to
    /// start instead of producing malformed IDs.
    #[error("epoch {epoch} ms is later than the current time {now} ms")]
    EpochInFuture {
        /// The configured epoch, in Unix milliseconds.
        epoch: u64,
        /// The clock reading at construction, in Unix milliseconds.
        now: u64,
    },

    /// The configured epoch is so far in the past that the current timestamp
    /// delta already exceeds the 41-bit timestamp field.
    #[error("epoch {epoch} ms is too far behind the current time {now} ms")]
    EpochTooFarInPast {
        /// The configured epoch, in Unix milliseconds.
        epoch: u64,
        /// The clock reading at construction, in Unix milliseconds.
        now: u64,
    },

    /// The clock reported a time earlier than the last emitted timestamp.
    ///
    /// No ID is produced and the generator state is unchanged; a later call
    /// succeeds once the clock catches up again. Retrying is up to the caller.
    #[error("clock moved backwards: last emitted at {last} ms, clock reads {now} ms")]
    ClockMovedBackwards {
        /// The last emitted timestamp, in Unix milliseconds.
        last: u64,
        /// The regressed clock reading, in Unix milliseconds.
        now: u64,
    },

    /// The clock reported a time earlier than the configured epoch.
    #[error("timestamp {timestamp} ms is earlier than epoch {epoch} ms")]
    TimestampBeforeEpoch {
        /// The clock reading, in Unix milliseconds.
        timestamp: u64,
        /// The configured epoch, in Unix milliseconds.
        epoch: u64,
    },

    /// The timestamp delta no longer fits in the 41-bit timestamp field.
    #[error("timestamp delta {delta} ms exceeds the timestamp field (max {max})")]
    TimestampOverflow {
        /// `timestamp - epoch`, in milliseconds.
        delta: u64,
        /// The largest delta the layout can hold.
        max: u64,
    },

    /// The sequence was exhausted and the clock did not advance within the
    /// configured maximum wait.
    #[error("clock did not pass {last} ms within {waited:?}")]
    OverflowWaitTimeout {
        /// The exhausted timestamp, in Unix milliseconds.
        last: u64,
        /// How long the generator waited before giving up.
        waited: Duration,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(all(feature = "lock", not(feature = "parking-lot")))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` for errors raised while validating configuration.
    ///
    /// These are fatal at startup and should never be retried.
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkerId { .. }
                | Self::EpochInFuture { .. }
                | Self::EpochTooFarInPast { .. }
        )
    }
}

#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
