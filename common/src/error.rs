use std::io;
use std::net::IpAddr;

use thiserror::Error;

use crate::network::range::SubnetDescriptor;

/// Fatal errors for a discovery run.
///
/// Every variant aborts the run before a single probe is dispatched.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The primary local address could not be determined.
    #[error("failed to resolve the local host address: {0}")]
    HostResolution(#[source] io::Error),
    /// No local interface carries the resolved address.
    #[error("no network interface owns the local address {0}")]
    InterfaceLookup(IpAddr),
    /// A subnet on the interface is wider than the scanner accepts.
    #[error("subnet {subnet} is wider than /{min_prefix}, refusing to scan it")]
    SubnetTooWide {
        subnet: SubnetDescriptor,
        min_prefix: u8,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pool size must be greater than zero")]
    ZeroPoolSize,
    #[error("probe timeout must be greater than zero")]
    ZeroProbeTimeout,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid prefix: {0} > 32")]
    InvalidPrefix(u8),
    #[error("invalid CIDR '{0}'")]
    InvalidCidr(String),
}
