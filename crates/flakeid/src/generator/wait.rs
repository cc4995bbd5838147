use std::time::Instant;

use crate::{Error, OverflowWait, Result, TimeSource, WaitStrategy};

/// Polls `time` until it reads strictly past `last` and returns that reading.
///
/// Readings at or below `last` (including a regressing clock) keep the wait
/// going. With `max_wait` set, gives up with [`Error::OverflowWaitTimeout`].
pub(crate) fn til_next_millis<T>(last: u64, time: &T, overflow: OverflowWait) -> Result<u64>
where
    T: TimeSource + ?Sized,
{
    let started = Instant::now();
    loop {
        let now = time.current_millis();
        if now > last {
            return Ok(now);
        }

        if let Some(max_wait) = overflow.max_wait {
            let waited = started.elapsed();
            if waited >= max_wait {
                return Err(Error::OverflowWaitTimeout { last, waited });
            }
        }

        match overflow.strategy {
            WaitStrategy::Spin => core::hint::spin_loop(),
            WaitStrategy::Yield => std::thread::yield_now(),
            WaitStrategy::Sleep(dur) => std::thread::sleep(dur),
        }
    }
}
