#![cfg(test)]
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use lanprobe_common::config::{Config, DEFAULT_ROUTE_PROBE};
use lanprobe_common::error::DiscoveryError;
use lanprobe_common::network::interface::{StaticNetwork, SystemNetwork};
use lanprobe_core::discovery::DiscoveryService;
use lanprobe_core::enumerator;
use lanprobe_core::network::tcp::TcpProbe;
use lanprobe_core::sink::DeviceRegistry;
use tokio::net::TcpListener;

use crate::util::{SlowProbe, host_with, ni, v4, v6};

fn config(pool_size: usize) -> Config {
    Config {
        pool_size,
        probe_timeout: Duration::from_millis(200),
        ..Config::default()
    }
}

/// A device listening on loopback is found by a real TCP probe; its silent
/// neighbour is not.
#[tokio::test]
async fn discovery_finds_loopback_listener() -> anyhow::Result<()> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let port = listener.local_addr()?.port();

    let cfg = Config {
        default_port: port,
        ..config(4)
    };
    let network = StaticNetwork::new(
        Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        vec![ni("lo", &[v4(127, 0, 0, 1, 30), v6("::1", 128)])],
    );
    let registry = Arc::new(DeviceRegistry::new("OpenSprinkler"));
    let prober = Arc::new(TcpProbe::new(port, cfg.probe_timeout));

    let service = DiscoveryService::new(cfg, Box::new(network), prober, registry.clone())?;
    let summary = service.start_scan()?.drain().await;

    assert_eq!(summary.submitted, 2);
    assert_eq!(summary.found, 1);

    let devices = registry.devices();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, "127_0_0_1");
    assert_eq!(devices[0].properties.hostname, Ipv4Addr::LOCALHOST);
    assert_eq!(devices[0].properties.port, port);
    assert_eq!(devices[0].properties.password, "opendoor");
    assert_eq!(devices[0].properties.refresh_interval, 60);
    Ok(())
}

#[tokio::test]
async fn overlapping_subnets_yield_one_record_per_device() -> anyhow::Result<()> {
    let local = Ipv4Addr::new(10, 0, 0, 1);
    // Two addresses from the same /30: every host address is scheduled twice.
    let network = host_with(local, &[v4(10, 0, 0, 1, 30), v4(10, 0, 0, 2, 30)]);
    let probe = Arc::new(SlowProbe {
        live: vec![Ipv4Addr::new(10, 0, 0, 2)],
        ..SlowProbe::default()
    });
    let registry = Arc::new(DeviceRegistry::new("OpenSprinkler"));

    let service =
        DiscoveryService::new(config(4), Box::new(network), probe.clone(), registry.clone())?;
    let summary = service.start_scan()?.drain().await;

    assert_eq!(summary.submitted, 4);
    assert_eq!(summary.found, 2);
    assert_eq!(registry.len(), 1);
    assert_eq!(probe.calls().get(&Ipv4Addr::new(10, 0, 0, 2)), Some(&2));
    Ok(())
}

#[tokio::test]
async fn small_pool_still_probes_every_target_once() -> anyhow::Result<()> {
    let local = Ipv4Addr::new(192, 168, 50, 1);
    let network = host_with(local, &[v4(192, 168, 50, 1, 26)]);
    let plan = enumerator::enumerate_scan_targets(&network)?;
    let targets = plan.targets.clone();
    assert_eq!(targets.len(), 62);

    let probe = Arc::new(SlowProbe::default());
    let service = DiscoveryService::new(
        config(4),
        Box::new(network),
        probe.clone(),
        Arc::new(DeviceRegistry::default()),
    )?;
    let summary = service.start_scan()?.drain().await;

    let calls = probe.calls();
    assert_eq!(summary.completed(), 62);
    assert_eq!(calls.len(), 62);
    assert!(targets.iter().all(|ip| calls.get(ip) == Some(&1)));
    Ok(())
}

#[tokio::test]
async fn unresolvable_host_dispatches_nothing() {
    let network = StaticNetwork::new(None, vec![ni("eth0", &[v4(192, 168, 1, 10, 24)])]);
    let probe = Arc::new(SlowProbe::default());
    let registry = Arc::new(DeviceRegistry::default());

    let service =
        DiscoveryService::new(config(4), Box::new(network), probe.clone(), registry.clone())
            .unwrap();
    let result = service.start_scan();

    assert!(matches!(result, Err(DiscoveryError::HostResolution(_))));
    assert!(probe.calls().is_empty());
    assert!(registry.is_empty());
}

#[test]
fn system_network_enumerates_ipv4_only() {
    // Needs a default route; offline machines only get a warning.
    match enumerator::enumerate_scan_targets(&SystemNetwork::new(DEFAULT_ROUTE_PROBE)) {
        Ok(plan) => {
            assert!(!plan.interface.is_empty());
            assert!(plan.local_addr.is_ipv4());
            for subnet in &plan.subnets {
                assert!(subnet.prefix() <= 32);
            }
        }
        Err(e) => eprintln!("WARNING: could not enumerate local subnet ({e})"),
    }
}
