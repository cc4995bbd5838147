use flakeid::{LockSnowflakeGenerator, MonotonicClock, SystemClock, TimeSource};

use crate::server::config::ClockKind;

/// Clock implementation selected at startup.
#[derive(Clone, Copy, Debug)]
pub enum Clock {
    System(SystemClock),
    Monotonic(MonotonicClock),
}

impl From<ClockKind> for Clock {
    fn from(kind: ClockKind) -> Self {
        match kind {
            ClockKind::System => Self::System(SystemClock),
            ClockKind::Monotonic => Self::Monotonic(MonotonicClock::new()),
        }
    }
}

impl TimeSource for Clock {
    fn current_millis(&self) -> u64 {
        match self {
            Self::System(clock) => clock.current_millis(),
            Self::Monotonic(clock) => clock.current_millis(),
        }
    }
}

/// The generator shared by every request handler.
pub type Generator = LockSnowflakeGenerator<Clock>;
