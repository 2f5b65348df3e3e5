//! # Interface Address Model
//!
//! An address exactly as it was configured on a local interface, together
//! with the prefix length of the network it belongs to.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use pnet::ipnetwork::IpNetwork;

use crate::network::range::SubnetDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

/// An address read from a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkAddress {
    addr: IpAddr,
    prefix: u8,
}

impl NetworkAddress {
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn family(&self) -> AddressFamily {
        match self.addr {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    /// The subnet this address lives in, for IPv4 addresses only.
    pub fn subnet(&self) -> Option<SubnetDescriptor> {
        match self.addr {
            IpAddr::V4(v4) => SubnetDescriptor::new(v4, self.prefix).ok(),
            IpAddr::V6(_) => None,
        }
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.addr {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        }
    }
}

impl From<IpNetwork> for NetworkAddress {
    fn from(net: IpNetwork) -> Self {
        Self {
            addr: net.ip(),
            prefix: net.prefix(),
        }
    }
}

impl From<&IpNetwork> for NetworkAddress {
    fn from(net: &IpNetwork) -> Self {
        Self::from(*net)
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
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
