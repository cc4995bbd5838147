use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(feature = "parking-lot")]
use parking_lot::{Mutex, MutexGuard};
#[cfg(not(feature = "parking-lot"))]
use std::sync::{Mutex, MutexGuard};

use crate::{
    GeneratorConfig, GeneratorState, Poll, Result, SnowflakeGenerator, SnowflakeId, TimeSource,
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The state lives in an [`Arc<Mutex<_>>`]: exactly one caller at a time runs
/// the clock read, drift check, overflow wait and encoding. Cloning the
/// generator shares that state, so clones never hand out the same ID.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - A single worker ID is shared by the whole process
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
pub struct LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    pub(crate) state: Arc<Mutex<GeneratorState>>,
    config: GeneratorConfig,
    time: T,
}

impl<T> Clone for LockSnowflakeGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            config: self.config,
            time: self.time.clone(),
        }
    }
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator after checking the epoch against `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpochInFuture`] or [`Error::EpochTooFarInPast`].
    ///
    /// # Example
    /// ```
    /// use flakeid::{CUSTOM_EPOCH, GeneratorConfig, LockSnowflakeGenerator, SystemClock};
    ///
    /// let config = GeneratorConfig::new(1, CUSTOM_EPOCH).unwrap();
    /// let generator = LockSnowflakeGenerator::try_new(config, SystemClock).unwrap();
    ///
    /// let a = generator.generate_id().unwrap();
    /// let b = generator.generate_id().unwrap();
    /// assert!(a < b);
    /// ```
    ///
    /// [`Error::EpochInFuture`]: crate::Error::EpochInFuture
    /// [`Error::EpochTooFarInPast`]: crate::Error::EpochTooFarInPast
    pub fn try_new(config: GeneratorConfig, time: T) -> Result<Self> {
        config.validate_epoch(time.current_millis())?;
        Ok(Self {
            state: Arc::new(Mutex::new(GeneratorState::new())),
            config,
            time,
        })
    }

    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// A snapshot of the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lock has been poisoned.
    pub fn state(&self) -> Result<GeneratorState> {
        Ok(*self.lock()?)
    }

    /// Generates a new ID, waiting out sequence exhaustion while holding the
    /// lock.
    ///
    /// # Errors
    ///
    /// See [`SnowflakeGenerator::generate_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(worker_id = self.config.worker_id())))]
    pub fn generate_id(&self) -> Result<SnowflakeId> {
        let mut state = self.lock()?;
        state.next_id(&self.config, &self.time)
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// The clock is read after the lock is acquired so that a reading taken
    /// before a long lock wait cannot look like a regression.
    ///
    /// # Example
    /// ```
    /// use flakeid::{CUSTOM_EPOCH, GeneratorConfig, LockSnowflakeGenerator, Poll, SystemClock};
    ///
    /// let config = GeneratorConfig::new(0, CUSTOM_EPOCH).unwrap();
    /// let generator = LockSnowflakeGenerator::try_new(config, SystemClock).unwrap();
    ///
    /// let id = loop {
    ///     match generator.poll_id() {
    ///         Ok(Poll::Ready { id }) => break id,
    ///         Ok(Poll::Pending { yield_for }) => {
    ///             std::thread::sleep(core::time::Duration::from_millis(yield_for));
    ///         }
    ///         Err(e) => panic!("Generator error: {e}"),
    ///     }
    /// };
    /// assert_eq!(id.worker_id(), 0);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`SnowflakeGenerator::poll_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(worker_id = self.config.worker_id())))]
    pub fn poll_id(&self) -> Result<Poll> {
        let mut state = self.lock()?;
        state.poll(self.time.current_millis(), &self.config)
    }

    fn lock(&self) -> Result<MutexGuard<'_, GeneratorState>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T> SnowflakeGenerator<T> for LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn try_new(config: GeneratorConfig, time: T) -> Result<Self> {
        Self::try_new(config, time)
    }

    fn config(&self) -> &GeneratorConfig {
        self.config()
    }

    fn state(&self) -> Result<GeneratorState> {
        self.state()
    }

    fn generate_id(&self) -> Result<SnowflakeId> {
        self.generate_id()
    }

    fn poll_id(&self) -> Result<Poll> {
        self.poll_id()
    }
}
