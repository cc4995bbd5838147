use core::{future::Future, time::Duration};
use std::time::Instant;

use super::SleepProvider;
use crate::{Error, Poll, Result, SnowflakeGenerator, SnowflakeId, TimeSource};

/// Extension trait for asynchronously generating Snowflake IDs.
///
/// Instead of blocking a thread through sequence exhaustion, the returned
/// future polls the generator and sleeps through the given
/// [`SleepProvider`] whenever it reports [`Poll::Pending`]. The config's
/// `max_wait` bound, if any, still applies.
pub trait SnowflakeGeneratorAsyncExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available Snowflake ID.
    ///
    /// # Errors
    ///
    /// This future may return any error the generator's
    /// [`SnowflakeGenerator::poll_id`] returns, plus
    /// [`Error::OverflowWaitTimeout`] when a wait bound is configured.
    fn generate_id_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>>
    where
        S: SleepProvider;
}

impl<G, T> SnowflakeGeneratorAsyncExt<T> for G
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    fn generate_id_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>>
    where
        S: SleepProvider,
    {
        async move {
            let max_wait = self.config().overflow_wait().max_wait;
            // Set on the first `Pending`: when the wait began and the
            // exhausted millisecond.
            let mut waiting: Option<(Instant, u64)> = None;
            loop {
                let yield_for = match self.poll_id() {
                    Ok(Poll::Ready { id }) => return Ok(id),
                    Ok(Poll::Pending { yield_for }) => yield_for,
                    // Readings at or below the exhausted millisecond keep the
                    // wait going, as in the blocking path.
                    Err(Error::ClockMovedBackwards { now, .. })
                        if waiting.is_some_and(|(_, last)| now <= last) =>
                    {
                        1
                    }
                    Err(err) => return Err(err),
                };

                let (started, last) = match waiting {
                    Some(waiting) => waiting,
                    None => {
                        let last = self.state()?.last_timestamp().unwrap_or_default();
                        *waiting.insert((Instant::now(), last))
                    }
                };
                if let Some(max_wait) = max_wait {
                    let waited = started.elapsed();
                    if waited >= max_wait {
                        return Err(Error::OverflowWaitTimeout { last, waited });
                    }
                }

                S::sleep_for(Duration::from_millis(yield_for)).await;
            }
        }
    }
}
