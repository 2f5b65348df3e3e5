//! Turns the host's own addressing into a list of addresses to probe.
//!
//! Only the interface that carries the primary local address is considered.
//! Each IPv4 address on it is expanded to the host addresses of its subnet;
//! IPv6 addresses are noted and skipped. A subnet wider than
//! [`MIN_SCAN_PREFIX`] fails the whole plan before anything is expanded.

use std::net::{IpAddr, Ipv4Addr};

use lanprobe_common::config::MIN_SCAN_PREFIX;
use lanprobe_common::error::DiscoveryError;
use lanprobe_common::network::interface::{self, LocalNetwork, NetworkInterfaceExtension};
use lanprobe_common::network::range::{self, SubnetDescriptor};
use tracing::debug;

/// The outcome of enumeration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub interface: String,
    pub local_addr: IpAddr,
    pub subnets: Vec<SubnetDescriptor>,
    /// Host addresses of every subnet, in interface address order.
    pub targets: Vec<Ipv4Addr>,
}

pub fn enumerate_scan_targets(network: &dyn LocalNetwork) -> Result<ScanPlan, DiscoveryError> {
    let (local_addr, intf) = interface::primary_interface(network)?;
    debug!("Local address {local_addr} belongs to interface {}", intf.name);

    let mut subnets = Vec::new();
    let mut targets = Vec::new();

    for address in intf.network_addresses() {
        match address.subnet() {
            Some(subnet) if subnet.prefix() < MIN_SCAN_PREFIX => {
                return Err(DiscoveryError::SubnetTooWide {
                    subnet,
                    min_prefix: MIN_SCAN_PREFIX,
                });
            }
            Some(subnet) => {
                debug!("Found interface IPv4 address to scan: {subnet}");
                targets.extend(range::expand_hosts(&subnet));
                subnets.push(subnet);
            }
            None => debug!("Skipping interface IPv6 address: {address}"),
        }
    }

    Ok(ScanPlan {
        interface: intf.name,
        local_addr,
        subnets,
        targets,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
