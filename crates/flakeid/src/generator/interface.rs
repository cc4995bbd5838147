use crate::{GeneratorConfig, GeneratorState, Poll, Result, SnowflakeId, TimeSource};

/// A minimal interface for generating Snowflake IDs.
pub trait SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the epoch does not fit the current
    /// clock reading (see [`GeneratorConfig::validate_epoch`]).
    fn try_new(config: GeneratorConfig, time: T) -> Result<Self>
    where
        Self: Sized;

    /// The configuration this generator was built with.
    fn config(&self) -> &GeneratorConfig;

    /// A snapshot of the sequence counter and drift guard.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    fn state(&self) -> Result<GeneratorState>;

    /// Generates the next ID, blocking through sequence exhaustion.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] if the clock regressed
    /// - [`Error::OverflowWaitTimeout`] if a wait bound is configured and hit
    /// - a field overflow error if the timestamp no longer fits the layout
    /// - [`Error::LockPoisoned`] for poisoned std locks
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::OverflowWaitTimeout`]: crate::Error::OverflowWaitTimeout
    /// [`Error::LockPoisoned`]: crate::Error
    fn generate_id(&self) -> Result<SnowflakeId>;

    /// Attempts to generate the next ID without blocking.
    ///
    /// Returns [`Poll::Pending`] instead of waiting when the sequence is
    /// exhausted for the current millisecond.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::generate_id`], minus the wait timeout.
    fn poll_id(&self) -> Result<Poll>;
}
