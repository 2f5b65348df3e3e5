//! The probing contract between the dispatcher and device protocols.
//!
//! A prober answers one question per address: is the device we are looking
//! for there? Failing to answer is the normal outcome for most addresses of a
//! subnet, so a failure carries no weight beyond the reason it is logged with.

use std::io;
use std::net::Ipv4Addr;

use async_trait::async_trait;
use thiserror::Error;

/// Why a single address did not turn out to be a device.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    #[error("host unreachable: {0}")]
    Unreachable(#[source] io::Error),
    #[error("connection refused")]
    Refused,
    #[error("timed out")]
    Timeout,
    #[error("device signature did not match")]
    SignatureMismatch,
}

#[async_trait]
pub trait Prober: Send + Sync {
    /// Bounds its own network wait. The dispatcher never times a probe out.
    async fn probe(&self, addr: Ipv4Addr) -> Result<(), ProbeFailure>;
}
