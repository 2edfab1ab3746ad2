use core::time::Duration;
use std::net::SocketAddr;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use linkflake_core::{
    ShortenerConfig,
    linkflake::{NodeIdentity, SystemClock, TWITTER_EPOCH, TimeSource},
};

/// Default epoch in milliseconds since the Unix epoch (the Twitter epoch).
const DEFAULT_EPOCH_MILLIS: u64 = TWITTER_EPOCH.as_millis() as u64;

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable output.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Which ID generator implementation backs the service.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Mutex-guarded generator.
    Lock,
    /// Lock-free compare-and-swap generator.
    Atomic,
}

/// Runtime configuration for the `linkflake-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults suitable for a single-node
/// deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "linkflake-server",
    version,
    about = "An HTTP URL shortener issuing Snowflake-backed base-62 codes"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Datacenter ID embedded in every generated ID, in `0..=31`.
    ///
    /// Environment variable: `DATACENTER_ID`
    #[arg(long, env = "DATACENTER_ID", default_value_t = 1)]
    pub datacenter_id: u8,

    /// Machine ID embedded in every generated ID, in `0..=31`.
    ///
    /// Each process sharing a datacenter must use a distinct machine ID; the
    /// server does not coordinate this.
    ///
    /// Environment variable: `MACHINE_ID`
    #[arg(long, env = "MACHINE_ID", default_value_t = 1)]
    pub machine_id: u8,

    /// Epoch subtracted from wall-clock time, in milliseconds since
    /// 1970-01-01 UTC. Must not change once IDs have been issued.
    ///
    /// Environment variable: `EPOCH_MILLIS`
    #[arg(long, env = "EPOCH_MILLIS", default_value_t = DEFAULT_EPOCH_MILLIS)]
    pub epoch_millis: u64,

    /// SQLite database path or `sqlite:` URL. Mappings are kept in memory
    /// when unset.
    ///
    /// Environment variable: `DATABASE_URL`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum short-code collisions tolerated per request. Unbounded when
    /// unset.
    ///
    /// Environment variable: `MAX_COLLISION_RETRIES`
    #[arg(long, env = "MAX_COLLISION_RETRIES")]
    pub max_collision_retries: Option<u32>,

    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// ID generator implementation.
    ///
    /// Environment variable: `GENERATOR`
    #[arg(long, env = "GENERATOR", value_enum, default_value_t = GeneratorKind::Lock)]
    pub generator: GeneratorKind,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: SocketAddr,
    pub node: NodeIdentity,
    pub epoch: Duration,
    pub database_url: Option<String>,
    pub shortener: ShortenerConfig,
    pub log_format: LogFormat,
    pub generator: GeneratorKind,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let server_addr = args
            .server_addr
            .parse()
            .with_context(|| format!("invalid SERVER_ADDR `{}`", args.server_addr))?;

        let node = NodeIdentity::new(args.datacenter_id, args.machine_id)
            .context("invalid DATACENTER_ID/MACHINE_ID")?;

        let now = SystemClock.current_millis();
        if args.epoch_millis > now {
            bail!(
                "EPOCH_MILLIS ({}) is in the future (now = {})",
                args.epoch_millis,
                now
            );
        }

        let database_url = args.database_url.filter(|url| !url.trim().is_empty());

        Ok(Self {
            server_addr,
            node,
            epoch: Duration::from_millis(args.epoch_millis),
            database_url,
            shortener: ShortenerConfig {
                max_collision_retries: args.max_collision_retries,
            },
            log_format: args.log_format,
            generator: args.generator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<ServerConfig> {
        let argv = core::iter::once("linkflake-server").chain(args.iter().copied());
        ServerConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn explicit_arguments_are_applied() {
        let config = parse(&[
            "--server-addr",
            "127.0.0.1:9000",
            "--datacenter-id",
            "3",
            "--machine-id",
            "31",
            "--epoch-millis",
            "1420070400000",
            "--database-url",
            "links.db",
            "--max-collision-retries",
            "5",
            "--log-format",
            "json",
            "--generator",
            "atomic",
        ])
        .unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.node, NodeIdentity::new(3, 31).unwrap());
        assert_eq!(config.epoch, Duration::from_millis(1_420_070_400_000));
        assert_eq!(config.database_url.as_deref(), Some("links.db"));
        assert_eq!(config.shortener.max_collision_retries, Some(5));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.generator, GeneratorKind::Atomic);
    }

    #[test]
    fn out_of_range_node_is_rejected() {
        assert!(parse(&["--datacenter-id", "32"]).is_err());
        assert!(parse(&["--machine-id", "200"]).is_err());
    }

    #[test]
    fn future_epoch_is_rejected() {
        let future = SystemClock.current_millis() + 86_400_000;
        let err = parse(&["--epoch-millis", &future.to_string()]).unwrap_err();
        assert!(err.to_string().contains("in the future"));
    }

    #[test]
    fn bad_address_is_rejected() {
        assert!(parse(&["--server-addr", "not-an-address"]).is_err());
    }

    #[test]
    fn blank_database_url_means_memory() {
        let config = parse(&["--database-url", "  "]).unwrap();
        assert!(config.database_url.is_none());
    }
}
