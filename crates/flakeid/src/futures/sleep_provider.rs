use core::{future::Future, time::Duration};

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// This allows the async generation path to be generic over runtimes like
/// `Tokio` or `Smol`.
pub trait SleepProvider {
    /// The returned future is `Send` so generation futures can move across
    /// worker threads.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
