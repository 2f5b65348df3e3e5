//! # Network Discovery Service
//!
//! Implements the "find devices on my subnet" use case.
//!
//! The service owns its collaborators, all passed in at construction:
//! 1. a [`LocalNetwork`] to enumerate targets from,
//! 2. a [`Prober`] that decides whether an address is a device,
//! 3. a [`DiscoverySink`] that receives every hit.

use std::sync::Arc;

use lanprobe_common::config::Config;
use lanprobe_common::error::DiscoveryError;
use lanprobe_common::network::interface::LocalNetwork;
use tracing::{debug, info};

use crate::enumerator::{self, ScanPlan};
use crate::probe::Prober;
use crate::scanner::{Dispatcher, ScanHandle};
use crate::sink::DiscoverySink;

pub struct DiscoveryService {
    network: Box<dyn LocalNetwork>,
    prober: Arc<dyn Prober>,
    sink: Arc<dyn DiscoverySink>,
    dispatcher: Dispatcher,
}

impl DiscoveryService {
    pub fn new(
        config: Config,
        network: Box<dyn LocalNetwork>,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn DiscoverySink>,
    ) -> Result<Self, DiscoveryError> {
        Ok(Self {
            network,
            prober,
            sink,
            dispatcher: Dispatcher::new(config)?,
        })
    }

    /// Works out what a scan would probe, without probing.
    pub fn plan(&self) -> Result<ScanPlan, DiscoveryError> {
        enumerator::enumerate_scan_targets(self.network.as_ref())
    }

    /// Starts one discovery run.
    ///
    /// Returns once every probe is queued. Enumeration errors abort the run
    /// before anything is dispatched. Await [`ScanHandle::drain`] for the end
    /// of the run.
    pub fn start_scan(&self) -> Result<ScanHandle, DiscoveryError> {
        debug!("Starting discovery of devices");

        let plan = self.plan()?;
        info!(
            "Scanning {} addresses on {} with {} workers",
            plan.targets.len(),
            plan.interface,
            self.dispatcher.pool_size()
        );

        let handle = self
            .dispatcher
            .dispatch(plan.targets, self.prober.clone(), self.sink.clone());

        debug!("Completed dispatch of device probes");
        Ok(handle)
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
