use crate::SnowflakeId;

/// Outcome of a non-blocking generation attempt.
///
/// - [`Poll::Ready`] carries a freshly committed ID.
/// - [`Poll::Pending`] means the sequence is exhausted for the current
///   millisecond. Nothing was committed; retry after `yield_for`
///   milliseconds.
///
/// # Example
///
/// ```
/// use flakeid::{BasicSnowflakeGenerator, GeneratorConfig, Poll, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let config = GeneratorConfig::new(1, 0).unwrap();
/// let generator = BasicSnowflakeGenerator::try_new(config, FixedTime).unwrap();
/// match generator.poll_id().unwrap() {
///     Poll::Ready { id } => println!("ID: {id}"),
///     Poll::Pending { yield_for } => println!("Back off for {yield_for} ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<ID = SnowflakeId> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// Milliseconds to wait before polling again.
        yield_for: u64,
    },
}

impl<ID> Poll<ID> {
    /// Returns `true` if an ID was produced.
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Returns `true` if the caller should back off.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Maps the ready ID, passing `Pending` through unchanged.
    pub fn map<U>(self, f: impl FnOnce(ID) -> U) -> Poll<U> {
        match self {
            Self::Ready { id } => Poll::Ready { id: f(id) },
            Self::Pending { yield_for } => Poll::Pending { yield_for },
        }
    }
}
