use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, GeneratorConfig, Result, SnowflakeId, TimeSource,
    generator::{Poll, wait::til_next_millis},
};

/// The per-generator sequence counter and clock drift guard.
///
/// Tracks the last wall-clock millisecond an ID was emitted at and the
/// sequence used within it. Every transition either commits a new
/// `(timestamp, sequence)` pair or leaves the state untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorState {
    last_timestamp: Option<u64>,
    sequence: u64,
}

/// A resolved `(timestamp, sequence)` pair awaiting encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    timestamp: u64,
    sequence: u64,
}

impl GeneratorState {
    /// A state that has never emitted an ID.
    pub const fn new() -> Self {
        Self {
            last_timestamp: None,
            sequence: 0,
        }
    }

    /// The last emitted wall-clock timestamp, or `None` before the first ID.
    pub const fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// The sequence of the last emitted ID.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Runs one non-blocking transition against the clock reading `now`.
    ///
    /// - `now < last`: [`Error::ClockMovedBackwards`]
    /// - `now == last` with sequence room: the next sequence is committed
    /// - `now == last` with the sequence exhausted: [`Poll::Pending`]
    /// - `now > last`, or nothing emitted yet: sequence resets to zero
    ///
    /// The ID is encoded before anything is committed, so an encoding error
    /// also leaves the state untouched.
    pub(crate) fn poll(&mut self, now: u64, config: &GeneratorConfig) -> Result<Poll> {
        let slot = match self.resolve(now)? {
            Poll::Ready { id } => id,
            Poll::Pending { yield_for } => return Ok(Poll::Pending { yield_for }),
        };
        let id = config.encode(slot.timestamp, slot.sequence)?;
        self.last_timestamp = Some(slot.timestamp);
        self.sequence = slot.sequence;
        Ok(Poll::Ready { id })
    }

    /// Produces the next ID, blocking on sequence exhaustion according to the
    /// config's [`OverflowWait`].
    ///
    /// The caller holds exclusive access to the state for the whole call,
    /// including the wait.
    ///
    /// [`OverflowWait`]: crate::OverflowWait
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, config, time)))]
    pub(crate) fn next_id<T>(&mut self, config: &GeneratorConfig, time: &T) -> Result<SnowflakeId>
    where
        T: TimeSource + ?Sized,
    {
        let mut now = time.current_millis();
        loop {
            match self.poll(now, config)? {
                Poll::Ready { id } => return Ok(id),
                Poll::Pending { .. } => {
                    let last = self.last_timestamp.unwrap_or(now);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(last, "sequence exhausted, waiting for the next millisecond");
                    now = til_next_millis(last, time, config.overflow_wait())?;
                }
            }
        }
    }

    fn resolve(&self, now: u64) -> Result<Poll<Slot>> {
        let Some(last) = self.last_timestamp else {
            return Ok(Poll::Ready {
                id: Slot {
                    timestamp: now,
                    sequence: 0,
                },
            });
        };

        match now.cmp(&last) {
            Ordering::Equal => {
                if self.sequence < SnowflakeId::max_sequence() {
                    Ok(Poll::Ready {
                        id: Slot {
                            timestamp: now,
                            sequence: self.sequence + 1,
                        },
                    })
                } else {
                    Ok(Poll::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => Ok(Poll::Ready {
                id: Slot {
                    timestamp: now,
                    sequence: 0,
                },
            }),
            Ordering::Less => Err(Self::cold_clock_behind(now, last)),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, "clock moved backwards, refusing to generate id");
        Error::ClockMovedBackwards { last, now }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeneratorConfig {
        GeneratorConfig::new(1, 0).unwrap()
    }

    fn ready(poll: Poll) -> SnowflakeId {
        match poll {
            Poll::Ready { id } => id,
            Poll::Pending { yield_for } => panic!("unexpected pending (yield for: {yield_for})"),
        }
    }

    #[test]
    fn first_call_starts_at_sequence_zero() {
        let mut state = GeneratorState::new();
        assert_eq!(state.last_timestamp(), None);

        let id = ready(state.poll(1000, &config()).unwrap());
        assert_eq!(id.to_raw(), (1000 << 22) | (1 << 12));
        assert_eq!(state.last_timestamp(), Some(1000));
        assert_eq!(state.sequence(), 0);
    }

    #[test]
    fn same_millisecond_increments_sequence() {
        let mut state = GeneratorState::new();
        ready(state.poll(1000, &config()).unwrap());
        let id = ready(state.poll(1000, &config()).unwrap());
        assert_eq!(id.to_raw(), (1000 << 22) | (1 << 12) | 1);
        assert_eq!(state.sequence(), 1);
    }

    #[test]
    fn new_millisecond_resets_sequence() {
        let mut state = GeneratorState::new();
        for _ in 0..10 {
            ready(state.poll(1000, &config()).unwrap());
        }
        assert_eq!(state.sequence(), 9);

        let id = ready(state.poll(1001, &config()).unwrap());
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.timestamp(), 1001);
    }

    #[test]
    fn exhausted_sequence_is_pending_without_commit() {
        let mut state = GeneratorState::new();
        for _ in 0..=SnowflakeId::max_sequence() {
            ready(state.poll(1000, &config()).unwrap());
        }
        let before = state;

        assert_eq!(
            state.poll(1000, &config()).unwrap(),
            Poll::Pending { yield_for: 1 }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn backwards_clock_is_rejected_without_commit() {
        let mut state = GeneratorState::new();
        ready(state.poll(1000, &config()).unwrap());
        ready(state.poll(1000, &config()).unwrap());
        let before = state;

        assert_eq!(
            state.poll(999, &config()),
            Err(Error::ClockMovedBackwards {
                last: 1000,
                now: 999
            })
        );
        assert_eq!(state, before);

        // Recovers once the clock catches up.
        let id = ready(state.poll(1000, &config()).unwrap());
        assert_eq!(id.sequence(), 2);
    }

    #[test]
    fn encoding_error_leaves_state_untouched() {
        let config = GeneratorConfig::new(1, 500).unwrap();
        let mut state = GeneratorState::new();

        assert!(matches!(
            state.poll(499, &config),
            Err(Error::TimestampBeforeEpoch { .. })
        ));
        assert_eq!(state, GeneratorState::new());
    }
}
