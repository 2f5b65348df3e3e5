//! # Subnet Range Model
//!
//! CIDR blocks and the host addresses they contain.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::RangeError;

/// Represents a continuous range of IPv4 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    /// A range that yields nothing.
    fn empty() -> Self {
        Self::new(Ipv4Addr::BROADCAST, Ipv4Addr::UNSPECIFIED)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone {
        let start: u32 = u32::from(self.start_addr);
        let end: u32 = u32::from(self.end_addr);
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn len(&self) -> u64 {
        let start = u64::from(u32::from(self.start_addr));
        let end = u64::from(u32::from(self.end_addr));
        if start > end { 0 } else { end - start + 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An IPv4 interface address together with its prefix length.
///
/// `base` is kept as configured; it is not masked down to the network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubnetDescriptor {
    base: Ipv4Addr,
    prefix: u8,
}

impl SubnetDescriptor {
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self, RangeError> {
        if prefix > 32 {
            return Err(RangeError::InvalidPrefix(prefix));
        }
        Ok(Self { base, prefix })
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (32 - p),
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.base) & self.mask())
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.base) | !self.mask())
    }

    /// The whole block, network and broadcast included.
    pub fn block(&self) -> Ipv4Range {
        Ipv4Range::new(self.network(), self.broadcast())
    }

    /// Usable host addresses.
    ///
    /// * `/0` to `/30`: everything strictly between network and broadcast.
    /// * `/31`: empty.
    /// * `/32`: the single configured address.
    pub fn hosts(&self) -> Ipv4Range {
        match self.prefix {
            32 => Ipv4Range::new(self.base, self.base),
            31 => Ipv4Range::empty(),
            _ => {
                let network = u32::from(self.network());
                let broadcast = u32::from(self.broadcast());
                Ipv4Range::new(Ipv4Addr::from(network + 1), Ipv4Addr::from(broadcast - 1))
            }
        }
    }

    pub fn host_count(&self) -> u64 {
        self.hosts().len()
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        u32::from(ip) & self.mask() == u32::from(self.network())
    }
}

impl fmt::Display for SubnetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

impl FromStr for SubnetDescriptor {
    type Err = RangeError;

    /// Parses CIDR notation like "192.168.1.10/24".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidCidr(s.to_string());

        let (ip_str, prefix_str) = s.split_once('/').ok_or_else(invalid)?;
        let base = ip_str.trim().parse::<Ipv4Addr>().map_err(|_| invalid())?;
        let prefix = prefix_str.trim().parse::<u8>().map_err(|_| invalid())?;

        Self::new(base, prefix)
    }
}

/// Expands a subnet into its usable host addresses.
pub fn expand_hosts(subnet: &SubnetDescriptor) -> Vec<Ipv4Addr> {
    subnet.hosts().iter().collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
