pub mod discover;
pub mod targets;

use std::net::SocketAddr;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use lanprobe_common::config::{
    Config, DEFAULT_CREDENTIAL, DEFAULT_LABEL, DEFAULT_POOL_SIZE, DEFAULT_PORT,
    DEFAULT_PROBE_TIMEOUT, DEFAULT_REFRESH_INTERVAL, DEFAULT_ROUTE_PROBE,
};
use lanprobe_common::error::ConfigError;

#[derive(Parser)]
#[command(name = "lanprobe")]
#[command(about = "Finds devices on the local subnet.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Show more log output (-vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe every address of the local subnet for devices
    #[command(alias = "d")]
    Discover,
    /// List the addresses a discovery would probe
    #[command(alias = "t")]
    Targets,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Number of probes allowed in flight at once
    #[arg(long, global = true, default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,

    /// Device port to probe and to record on discovered devices
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Password recorded on discovered devices
    #[arg(long, global = true, default_value = DEFAULT_CREDENTIAL)]
    pub password: String,

    /// Refresh interval in seconds recorded on discovered devices
    #[arg(long, global = true, default_value_t = DEFAULT_REFRESH_INTERVAL)]
    pub refresh: u64,

    /// Connect timeout for a single probe, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Label given to discovered devices
    #[arg(long, global = true, default_value = DEFAULT_LABEL)]
    pub label: String,

    /// Address used to find the outbound interface (never contacted)
    #[arg(long, global = true, default_value_t = DEFAULT_ROUTE_PROBE)]
    pub route_probe: SocketAddr,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl ScanArgs {
    /// Builds the run configuration, rejecting values no scan can run with.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let cfg = Config {
            pool_size: self.pool_size,
            default_port: self.port,
            default_credential: self.password.clone(),
            default_refresh_interval: self.refresh,
            probe_timeout: Duration::from_millis(self.timeout_ms),
            route_probe: self.route_probe,
            device_label: self.label.clone(),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
