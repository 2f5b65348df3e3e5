use std::net::Ipv4Addr;
use std::sync::Arc;

use lanprobe_common::config::Config;
use tracing::trace;

use crate::probe::Prober;
use crate::sink::{DiscoveryResult, DiscoverySink};

/// Everything a job borrows from the run that spawned it.
pub(crate) struct JobContext {
    pub(crate) prober: Arc<dyn Prober>,
    pub(crate) sink: Arc<dyn DiscoverySink>,
    pub(crate) config: Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobOutcome {
    Found,
    Missed,
}

/// One probe of one address.
pub(crate) struct ScanJob {
    target: Ipv4Addr,
    ctx: Arc<JobContext>,
}

impl ScanJob {
    pub(crate) fn new(target: Ipv4Addr, ctx: Arc<JobContext>) -> Self {
        Self { target, ctx }
    }

    /// Probes the target and reports it on success. Failures end here.
    pub(crate) async fn run(self) -> JobOutcome {
        match self.ctx.prober.probe(self.target).await {
            Ok(()) => {
                let result = DiscoveryResult::with_defaults(self.target, &self.ctx.config);
                self.ctx.sink.report(result);
                JobOutcome::Found
            }
            Err(failure) => {
                trace!(ip = %self.target, "Probe failed: {failure}");
                JobOutcome::Missed
            }
        }
    }
}
