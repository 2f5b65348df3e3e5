use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use crate::error::ConfigError;

/// Number of probes allowed in flight at once.
pub const DEFAULT_POOL_SIZE: usize = 15;
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_CREDENTIAL: &str = "opendoor";
/// Seconds between device refreshes once a device has been added.
pub const DEFAULT_REFRESH_INTERVAL: u64 = 60;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_LABEL: &str = "OpenSprinkler";

/// Shortest prefix whose subnet is still expanded and probed.
///
/// A /16 is 65534 hosts. Anything wider is refused before expansion.
pub const MIN_SCAN_PREFIX: u8 = 16;

/// Destination used to ask the kernel for the outbound source address.
///
/// Nothing is ever sent to it.
pub const DEFAULT_ROUTE_PROBE: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(1, 1, 1, 1), 53));

/// Read-only settings for a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pool_size: usize,
    pub default_port: u16,
    pub default_credential: String,
    pub default_refresh_interval: u64,
    /// Upper bound on a single connection attempt.
    pub probe_timeout: Duration,
    pub route_probe: SocketAddr,
    /// Label given to every discovered device record.
    pub device_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            default_port: DEFAULT_PORT,
            default_credential: DEFAULT_CREDENTIAL.to_string(),
            default_refresh_interval: DEFAULT_REFRESH_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            route_probe: DEFAULT_ROUTE_PROBE,
            device_label: DEFAULT_LABEL.to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::ZeroProbeTimeout);
        }
        Ok(())
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
