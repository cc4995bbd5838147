use core::{future::Future, time::Duration};

use crate::{
    Result, SleepProvider, SnowflakeGenerator, SnowflakeGeneratorAsyncExt, SnowflakeId,
    TimeSource,
};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately. Since a pending generator needs at most a millisecond to
/// recover, yielding usually resolves sooner than Tokio's 1ms timer
/// granularity, at the cost of more scheduler churn under load.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

/// Extension trait for asynchronously generating Snowflake IDs using the
/// [`tokio`](https://docs.rs/tokio) async runtime.
///
/// Uses [`TokioSleep`] as the sleep provider, so callers don't have to name
/// one.
pub trait SnowflakeGeneratorAsyncTokioExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available Snowflake ID using
    /// [`TokioSleep`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails.
    fn generate_id_tokio(&self) -> impl Future<Output = Result<SnowflakeId>>;
}

impl<G, T> SnowflakeGeneratorAsyncTokioExt<T> for G
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    fn generate_id_tokio(&self) -> impl Future<Output = Result<SnowflakeId>> {
        <Self as SnowflakeGeneratorAsyncExt<T>>::generate_id_async::<TokioSleep>(self)
    }
}
