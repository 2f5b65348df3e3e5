use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

use crate::error::DiscoveryError;
use crate::network::address::NetworkAddress;

/// Access to the host's own addressing.
///
/// The system implementation asks the kernel. Tests substitute fixed data.
pub trait LocalNetwork: Send + Sync {
    /// The address this machine uses for outbound IPv4 traffic.
    fn local_address(&self) -> io::Result<IpAddr>;

    fn interfaces(&self) -> Vec<NetworkInterface>;
}

/// [`LocalNetwork`] backed by the operating system.
#[derive(Debug, Clone, Copy)]
pub struct SystemNetwork {
    route_probe: SocketAddr,
}

impl SystemNetwork {
    pub fn new(route_probe: SocketAddr) -> Self {
        Self { route_probe }
    }
}

impl LocalNetwork for SystemNetwork {
    fn local_address(&self) -> io::Result<IpAddr> {
        resolve_route_source_ip(self.route_probe)
    }

    fn interfaces(&self) -> Vec<NetworkInterface> {
        datalink::interfaces()
    }
}

/// [`LocalNetwork`] answering from fixed data.
#[derive(Debug, Clone, Default)]
pub struct StaticNetwork {
    local: Option<IpAddr>,
    interfaces: Vec<NetworkInterface>,
}

impl StaticNetwork {
    pub fn new(local: Option<IpAddr>, interfaces: Vec<NetworkInterface>) -> Self {
        Self { local, interfaces }
    }
}

impl LocalNetwork for StaticNetwork {
    fn local_address(&self) -> io::Result<IpAddr> {
        self.local
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "local host is unknown"))
    }

    fn interfaces(&self) -> Vec<NetworkInterface> {
        self.interfaces.clone()
    }
}

pub trait NetworkInterfaceExtension {
    fn network_addresses(&self) -> Vec<NetworkAddress>;
    fn owns(&self, ip: IpAddr) -> bool;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn network_addresses(&self) -> Vec<NetworkAddress> {
        self.ips.iter().map(NetworkAddress::from).collect()
    }

    fn owns(&self, ip: IpAddr) -> bool {
        self.ips.iter().any(|net: &IpNetwork| net.ip() == ip)
    }
}

/// Resolves the primary local address and the interface that carries it.
pub fn primary_interface(
    network: &dyn LocalNetwork,
) -> Result<(IpAddr, NetworkInterface), DiscoveryError> {
    let local_addr = network
        .local_address()
        .map_err(DiscoveryError::HostResolution)?;

    let interface = find_owning_interface(network.interfaces(), local_addr)
        .ok_or(DiscoveryError::InterfaceLookup(local_addr))?;

    Ok((local_addr, interface))
}

fn find_owning_interface(
    interfaces: Vec<NetworkInterface>,
    ip: IpAddr,
) -> Option<NetworkInterface> {
    interfaces.into_iter().find(|iface| iface.owns(ip))
}

/// Lets the kernel pick a route and reports the source address it chose.
///
/// `connect` on a UDP socket only sets the default peer, no packet leaves the host.
fn resolve_route_source_ip(route_probe: SocketAddr) -> io::Result<IpAddr> {
    let bind_addr = if route_probe.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr)?;
    socket.connect(route_probe)?;
    let local = socket.local_addr()?.ip();

    if local.is_unspecified() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no route towards {route_probe}"),
        ));
    }
    Ok(local)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
