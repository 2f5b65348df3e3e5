//! Where successful probes end up.
//!
//! Jobs hand a [`DiscoveryResult`] to whatever [`DiscoverySink`] they were
//! dispatched with. Reports arrive in any order and the same address may be
//! reported more than once, so sinks deduplicate by address themselves.

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::{Mutex, PoisonError};

use lanprobe_common::config::Config;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// Connection properties for a device found at `hostname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryResult {
    pub hostname: Ipv4Addr,
    pub port: u16,
    pub password: String,
    /// Seconds.
    pub refresh_interval: u64,
}

impl DiscoveryResult {
    /// A result carrying the protocol defaults from `cfg`.
    pub fn with_defaults(hostname: Ipv4Addr, cfg: &Config) -> Self {
        Self {
            hostname,
            port: cfg.default_port,
            password: cfg.default_credential.clone(),
            refresh_interval: cfg.default_refresh_interval,
        }
    }
}

/// A device record, identified by its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    pub id: String,
    pub label: String,
    pub properties: DiscoveryResult,
}

impl DiscoveredDevice {
    pub fn new(label: impl Into<String>, properties: DiscoveryResult) -> Self {
        Self {
            id: device_id(properties.hostname),
            label: label.into(),
            properties,
        }
    }
}

impl fmt::Display for DiscoveredDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) at {}:{}",
            self.label, self.id, self.properties.hostname, self.properties.port
        )
    }
}

/// `192.168.1.10` becomes `192_168_1_10`.
pub fn device_id(addr: Ipv4Addr) -> String {
    addr.to_string().replace('.', "_")
}

pub trait DiscoverySink: Send + Sync {
    fn report(&self, result: DiscoveryResult);
}

impl<F> DiscoverySink for F
where
    F: Fn(DiscoveryResult) + Send + Sync,
{
    fn report(&self, result: DiscoveryResult) {
        self(result)
    }
}

impl DiscoverySink for UnboundedSender<DiscoveryResult> {
    fn report(&self, result: DiscoveryResult) {
        // A dropped receiver means nobody is listening anymore.
        let _ = self.send(result);
    }
}

/// Keeps one [`DiscoveredDevice`] per address.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    label: String,
    devices: Mutex<BTreeMap<Ipv4Addr, DiscoveredDevice>>,
}

impl DeviceRegistry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            devices: Mutex::new(BTreeMap::new()),
        }
    }

    /// Devices ordered by address.
    pub fn devices(&self) -> Vec<DiscoveredDevice> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiscoverySink for DeviceRegistry {
    fn report(&self, result: DiscoveryResult) {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);

        if devices.contains_key(&result.hostname) {
            debug!("Ignoring repeated report for {}", result.hostname);
            return;
        }

        let device = DiscoveredDevice::new(self.label.clone(), result);
        info!("Discovered {device}");
        devices.insert(device.properties.hostname, device);
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
