use core::time::Duration;

use crate::{Error, Result, SnowflakeId};

/// What a blocking generator does between clock polls while it waits for the
/// next millisecond after exhausting the sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Busy-wait with [`core::hint::spin_loop`].
    #[default]
    Spin,
    /// Yield the thread with [`std::thread::yield_now`].
    Yield,
    /// Sleep for the given duration between polls.
    Sleep(Duration),
}

/// How sequence exhaustion is resolved by the blocking generation path.
///
/// The default spins without a bound: the caller always gets an ID once the
/// clock advances. Setting `max_wait` turns a stalled clock into
/// [`Error::OverflowWaitTimeout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverflowWait {
    /// How to pass the time between clock polls.
    pub strategy: WaitStrategy,
    /// Give up after this long. `None` waits for as long as it takes.
    pub max_wait: Option<Duration>,
}

impl OverflowWait {
    /// An unbounded wait using `strategy`.
    pub const fn new(strategy: WaitStrategy) -> Self {
        Self {
            strategy,
            max_wait: None,
        }
    }

    /// Bounds the wait; exceeding it fails with
    /// [`Error::OverflowWaitTimeout`].
    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

/// Immutable generator configuration: worker identity, epoch and overflow
/// policy.
///
/// The worker ID is validated here. The epoch can only be checked against a
/// clock, which happens when the generator is built.
///
/// # Example
///
/// ```
/// use flakeid::{CUSTOM_EPOCH, Error, GeneratorConfig};
///
/// let config = GeneratorConfig::new(1, CUSTOM_EPOCH).unwrap();
/// assert_eq!(config.worker_id(), 1);
///
/// assert!(matches!(
///     GeneratorConfig::new(1024, CUSTOM_EPOCH),
///     Err(Error::InvalidWorkerId { worker_id: 1024, max: 1023 })
/// ));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    worker_id: u64,
    epoch_millis: u64,
    overflow: OverflowWait,
}

impl GeneratorConfig {
    /// Builds a configuration with the default [`OverflowWait`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if `worker_id` exceeds
    /// [`SnowflakeId::max_worker_id`].
    pub const fn new(worker_id: u64, epoch_millis: u64) -> Result<Self> {
        if worker_id > SnowflakeId::max_worker_id() {
            return Err(Error::InvalidWorkerId {
                worker_id,
                max: SnowflakeId::max_worker_id(),
            });
        }
        Ok(Self {
            worker_id,
            epoch_millis,
            overflow: OverflowWait::new(WaitStrategy::Spin),
        })
    }

    /// Replaces the overflow policy.
    #[must_use]
    pub const fn with_overflow_wait(mut self, overflow: OverflowWait) -> Self {
        self.overflow = overflow;
        self
    }

    /// The worker ID packed into every ID.
    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// The custom epoch, in Unix milliseconds.
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }

    /// The policy for waiting out sequence exhaustion.
    pub const fn overflow_wait(&self) -> OverflowWait {
        self.overflow
    }

    /// Checks the epoch against a clock reading.
    ///
    /// # Errors
    ///
    /// - [`Error::EpochInFuture`] if `now` is earlier than the epoch
    /// - [`Error::EpochTooFarInPast`] if `now - epoch` already exceeds the
    ///   timestamp field
    pub const fn validate_epoch(&self, now: u64) -> Result<()> {
        let epoch = self.epoch_millis;
        match now.checked_sub(epoch) {
            None => Err(Error::EpochInFuture { epoch, now }),
            Some(delta) if delta > SnowflakeId::max_timestamp() => {
                Err(Error::EpochTooFarInPast { epoch, now })
            }
            Some(_) => Ok(()),
        }
    }

    /// Packs a wall-clock timestamp and a sequence into an ID.
    ///
    /// Computes `((timestamp - epoch) << 22) | (worker_id << 12) | sequence`.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampBeforeEpoch`] if `timestamp < epoch`
    /// - [`Error::TimestampOverflow`] if the delta exceeds 41 bits
    pub const fn encode(&self, timestamp: u64, sequence: u64) -> Result<SnowflakeId> {
        debug_assert!(sequence <= SnowflakeId::max_sequence(), "sequence overflow");
        let Some(delta) = timestamp.checked_sub(self.epoch_millis) else {
            return Err(Error::TimestampBeforeEpoch {
                timestamp,
                epoch: self.epoch_millis,
            });
        };
        if delta > SnowflakeId::max_timestamp() {
            return Err(Error::TimestampOverflow {
                delta,
                max: SnowflakeId::max_timestamp(),
            });
        }
        Ok(SnowflakeId::from_components(delta, self.worker_id, sequence))
    }
}
