//! Subnet device discovery.
//!
//! [`discovery::DiscoveryService`] ties the pieces together: the
//! [`enumerator`] lists the addresses of the local subnet, the [`scanner`]
//! probes them on a bounded pool, and every hit is handed to a [`sink`].

pub mod discovery;
pub mod enumerator;
pub mod network;
pub mod probe;
pub mod scanner;
pub mod sink;
