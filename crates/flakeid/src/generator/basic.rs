use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    GeneratorConfig, GeneratorState, Poll, Result, SnowflakeGenerator, SnowflakeId, TimeSource,
};

/// A non-concurrent Snowflake ID generator suitable for single-threaded
/// environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: its state
/// lives in a [`Cell`], which makes it `!Sync`.
///
/// ## Recommended When
/// - Each thread or task owns its own generator (and its own worker ID)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct BasicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    state: Cell<GeneratorState>,
    config: GeneratorConfig,
    time: T,
}

impl<T> BasicSnowflakeGenerator<T>
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
    /// use flakeid::{BasicSnowflakeGenerator, CUSTOM_EPOCH, GeneratorConfig, SystemClock};
    ///
    /// let config = GeneratorConfig::new(1, CUSTOM_EPOCH).unwrap();
    /// let generator = BasicSnowflakeGenerator::try_new(config, SystemClock).unwrap();
    ///
    /// let id = generator.generate_id().unwrap();
    /// assert_eq!(id.worker_id(), 1);
    /// ```
    ///
    /// [`Error::EpochInFuture`]: crate::Error::EpochInFuture
    /// [`Error::EpochTooFarInPast`]: crate::Error::EpochTooFarInPast
    pub fn try_new(config: GeneratorConfig, time: T) -> Result<Self> {
        config.validate_epoch(time.current_millis())?;
        Ok(Self {
            state: Cell::new(GeneratorState::new()),
            config,
            time,
        })
    }

    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> GeneratorState {
        self.state.get()
    }

    /// Generates a new ID, waiting out sequence exhaustion.
    ///
    /// # Errors
    ///
    /// See [`SnowflakeGenerator::generate_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(worker_id = self.config.worker_id())))]
    pub fn generate_id(&self) -> Result<SnowflakeId> {
        let mut state = self.state.get();
        let id = state.next_id(&self.config, &self.time)?;
        self.state.set(state);
        Ok(id)
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// # Example
    /// ```
    /// use flakeid::{BasicSnowflakeGenerator, GeneratorConfig, MonotonicClock, Poll};
    ///
    /// let config = GeneratorConfig::new(0, 0).unwrap();
    /// let generator = BasicSnowflakeGenerator::try_new(config, MonotonicClock::new()).unwrap();
    ///
    /// let id = loop {
    ///     match generator.poll_id().unwrap() {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { .. } => std::thread::yield_now(),
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
        let mut state = self.state.get();
        let poll = state.poll(self.time.current_millis(), &self.config)?;
        self.state.set(state);
        Ok(poll)
    }
}

impl<T> SnowflakeGenerator<T> for BasicSnowflakeGenerator<T>
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
        Ok(self.state())
    }

    fn generate_id(&self) -> Result<SnowflakeId> {
        self.generate_id()
    }

    fn poll_id(&self) -> Result<Poll> {
        self.poll_id()
    }
}
