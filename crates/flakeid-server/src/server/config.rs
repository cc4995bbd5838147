use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use flakeid::{GeneratorConfig, OverflowWait, SnowflakeId, WaitStrategy};

/// Runtime configuration for the `flakeid-server` binary.
///
/// All values are parsed from CLI arguments or environment variables. A `.env`
/// file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid-server",
    version,
    about = "An HTTP service handing out Snowflake IDs"
)]
pub struct CliArgs {
    /// Worker ID embedded in every ID, in `[0, 1023]`.
    ///
    /// Must be unique across every instance sharing an ID namespace; nothing
    /// here coordinates it.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID")]
    pub worker_id: u64,

    /// Custom epoch in Unix milliseconds. Must not be later than now.
    ///
    /// Environment variable: `EPOCH`
    #[arg(long, env = "EPOCH")]
    pub epoch: u64,

    /// TCP address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:5001"))]
    pub server_addr: String,

    /// Time source used by the generator.
    ///
    /// `system` follows the wall clock and reports a regression when it steps
    /// back. `monotonic` anchors to the wall clock once at startup and never
    /// goes backwards.
    ///
    /// Environment variable: `CLOCK`
    #[arg(long, env = "CLOCK", value_enum, default_value_t = ClockKind::System)]
    pub clock: ClockKind,

    /// How a request waits when the current millisecond's sequence is
    /// exhausted.
    ///
    /// `yield` and `sleep` release the generator lock and yield to Tokio or
    /// sleep on its timer. `spin` busy-waits on a blocking thread while
    /// holding the lock.
    ///
    /// Environment variable: `WAIT_STRATEGY`
    #[arg(long, env = "WAIT_STRATEGY", value_enum, default_value_t = WaitMode::Yield)]
    pub wait_strategy: WaitMode,

    /// Upper bound in milliseconds on a single overflow wait. Unbounded when
    /// unset.
    ///
    /// Environment variable: `MAX_WAIT_MS`
    #[arg(long, env = "MAX_WAIT_MS")]
    pub max_wait_ms: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    System,
    Monotonic,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    Spin,
    Yield,
    Sleep,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub clock: ClockKind,
    pub wait_mode: WaitMode,
    pub generator: GeneratorConfig,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_wait_ms == Some(0) {
            bail!("MAX_WAIT_MS must be greater than 0");
        }

        let mut overflow = OverflowWait::new(WaitStrategy::Spin);
        if let Some(ms) = args.max_wait_ms {
            overflow = overflow.with_max_wait(Duration::from_millis(ms));
        }

        let generator = GeneratorConfig::new(args.worker_id, args.epoch)
            .with_context(|| {
                format!(
                    "WORKER_ID must be in [0, {}]",
                    SnowflakeId::max_worker_id()
                )
            })?
            .with_overflow_wait(overflow);

        Ok(Self {
            server_addr: args.server_addr,
            clock: args.clock,
            wait_mode: args.wait_strategy,
            generator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<ServerConfig> {
        let argv = ["flakeid-server"].iter().chain(args);
        ServerConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn defaults() {
        let config = parse(&["--worker-id", "1", "--epoch", "1735689600000"]).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:5001");
        assert_eq!(config.clock, ClockKind::System);
        assert_eq!(config.wait_mode, WaitMode::Yield);
        assert_eq!(config.generator.worker_id(), 1);
        assert_eq!(config.generator.epoch_millis(), 1_735_689_600_000);
        assert_eq!(config.generator.overflow_wait().max_wait, None);
    }

    #[test]
    fn explicit_values() {
        let config = parse(&[
            "--worker-id",
            "1023",
            "--epoch",
            "0",
            "--server-addr",
            "127.0.0.1:8080",
            "--clock",
            "monotonic",
            "--wait-strategy",
            "sleep",
            "--max-wait-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.clock, ClockKind::Monotonic);
        assert_eq!(config.wait_mode, WaitMode::Sleep);
        assert_eq!(config.generator.worker_id(), 1023);
        assert_eq!(
            config.generator.overflow_wait().max_wait,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn worker_id_out_of_range() {
        let err = parse(&["--worker-id", "1024", "--epoch", "0"]).unwrap_err();
        assert!(err.to_string().contains("WORKER_ID"));
        assert!(matches!(
            err.downcast_ref::<flakeid::Error>(),
            Some(flakeid::Error::InvalidWorkerId { worker_id: 1024, .. })
        ));
    }

    #[test]
    fn zero_max_wait_rejected() {
        assert!(parse(&["--worker-id", "1", "--epoch", "0", "--max-wait-ms", "0"]).is_err());
    }

    #[test]
    fn unknown_clock_rejected() {
        assert!(parse(&["--worker-id", "1", "--epoch", "0", "--clock", "atomic"]).is_err());
    }
}
