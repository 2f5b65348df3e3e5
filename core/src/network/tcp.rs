use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::probe::{ProbeFailure, Prober};

/// Treats any host accepting a TCP connection on `port` as a device.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    port: u16,
    connect_timeout: Duration,
}

impl TcpProbe {
    pub fn new(port: u16, connect_timeout: Duration) -> Self {
        Self {
            port,
            connect_timeout,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[async_trait]
impl Prober for TcpProbe {
    async fn probe(&self, addr: Ipv4Addr) -> Result<(), ProbeFailure> {
        let socket_addr = SocketAddr::new(IpAddr::V4(addr), self.port);

        match timeout(self.connect_timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
                Err(ProbeFailure::Refused)
            }
            Ok(Err(e)) => Err(ProbeFailure::Unreachable(e)),
            Err(_elapsed) => Err(ProbeFailure::Timeout),
        }
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
