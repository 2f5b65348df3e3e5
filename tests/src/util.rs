use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lanprobe_common::network::interface::StaticNetwork;
use lanprobe_core::probe::{ProbeFailure, Prober};
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};

pub fn ni(name: &str, ips: &[IpNetwork]) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        description: "".into(),
        index: 1,
        mac: None,
        ips: ips.to_vec(),
        flags: 0,
    }
}

pub fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
    IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
}

pub fn v6(s: &str, p: u8) -> IpNetwork {
    IpNetwork::V6(Ipv6Network::new(s.parse().unwrap(), p).unwrap())
}

/// A host whose primary interface carries `ips`.
pub fn host_with(local: Ipv4Addr, ips: &[IpNetwork]) -> StaticNetwork {
    StaticNetwork::new(
        Some(IpAddr::V4(local)),
        vec![ni("lo", &[v4(127, 0, 0, 1, 8)]), ni("eth0", ips)],
    )
}

/// Sleeps for a per-address latency, then answers for `live` addresses only.
#[derive(Default)]
pub struct SlowProbe {
    pub live: Vec<Ipv4Addr>,
    pub calls: Mutex<HashMap<Ipv4Addr, usize>>,
}

impl SlowProbe {
    pub fn calls(&self) -> HashMap<Ipv4Addr, usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for SlowProbe {
    async fn probe(&self, addr: Ipv4Addr) -> Result<(), ProbeFailure> {
        *self.calls.lock().unwrap().entry(addr).or_default() += 1;
        // Every seventh address is much slower than the rest.
        let latency = if addr.octets()[3] % 7 == 0 { 60 } else { 2 };
        tokio::time::sleep(Duration::from_millis(latency)).await;

        if self.live.contains(&addr) {
            Ok(())
        } else {
            Err(ProbeFailure::Timeout)
        }
    }
}
