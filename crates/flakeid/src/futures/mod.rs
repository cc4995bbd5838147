mod runtime;
mod sleep_provider;
mod snowflake;

#[cfg_attr(docsrs, doc(cfg(any(feature = "async-tokio", feature = "async-smol"))))]
pub use runtime::*;
pub use sleep_provider::*;
pub use snowflake::*;
