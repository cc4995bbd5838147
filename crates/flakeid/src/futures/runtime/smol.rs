use core::{future::Future, time::Duration};

use smol::Timer;

use crate::{
    Result, SleepProvider, SnowflakeGenerator, SnowflakeGeneratorAsyncExt, SnowflakeId,
    TimeSource,
};

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        async move {
            Timer::after(dur).await;
        }
    }
}

/// An implementation of [`SleepProvider`] using Smol's yield.
///
/// Yields to the executor instead of arming a timer. Useful when a pending
/// generator is expected to recover within the current millisecond.
pub struct SmolYield;
impl SleepProvider for SmolYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        smol::future::yield_now()
    }
}

/// Extension trait for asynchronously generating Snowflake IDs using the
/// [`smol`](https://docs.rs/smol) async runtime.
pub trait SnowflakeGeneratorAsyncSmolExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available Snowflake ID using
    /// [`SmolSleep`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails.
    fn generate_id_smol(&self) -> impl Future<Output = Result<SnowflakeId>>;
}

impl<G, T> SnowflakeGeneratorAsyncSmolExt<T> for G
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    fn generate_id_smol(&self) -> impl Future<Output = Result<SnowflakeId>> {
        <Self as SnowflakeGeneratorAsyncExt<T>>::generate_id_async::<SmolSleep>(self)
    }
}
