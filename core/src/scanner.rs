//! The scan dispatcher.
//!
//! A scan runs in two explicit phases:
//!
//! 1. [`Dispatcher::dispatch`] submits one job per target address and returns
//!    right away with a [`ScanHandle`].
//! 2. [`ScanHandle::drain`] waits until every submitted job has finished and
//!    reports how the run went.
//!
//! At most `pool_size` probes are in flight at any moment, no matter how many
//! targets were submitted. Jobs share nothing mutable; a job that fails or
//! panics never affects its siblings.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lanprobe_common::config::Config;
use lanprobe_common::error::ConfigError;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::probe::Prober;
use crate::sink::DiscoverySink;

mod job;

use job::{JobContext, JobOutcome, ScanJob};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Config,
}

impl Dispatcher {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn pool_size(&self) -> usize {
        self.config.pool_size
    }

    /// Submits one job per target and returns once all of them are queued.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(
        &self,
        targets: Vec<Ipv4Addr>,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn DiscoverySink>,
    ) -> ScanHandle {
        let ctx = Arc::new(JobContext {
            prober,
            sink,
            config: self.config.clone(),
        });
        let pool = Arc::new(Semaphore::new(self.config.pool_size));
        let progress = Arc::new(ScanProgress::new(targets.len()));
        let mut jobs = JoinSet::new();

        for target in targets {
            let job = ScanJob::new(target, ctx.clone());
            let pool = pool.clone();
            let progress = progress.clone();

            jobs.spawn(async move {
                let _done = CompletionGuard(progress);
                let Ok(_permit) = pool.acquire_owned().await else {
                    return JobOutcome::Missed;
                };
                job.run().await
            });
        }

        debug!(
            "Dispatched {} probe jobs across a pool of {}",
            progress.submitted, self.config.pool_size
        );

        ScanHandle { jobs, progress }
    }
}

/// Live counters for a running scan.
#[derive(Debug)]
pub struct ScanProgress {
    submitted: usize,
    completed: AtomicUsize,
}

impl ScanProgress {
    fn new(submitted: usize) -> Self {
        Self {
            submitted,
            completed: AtomicUsize::new(0),
        }
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Counts a job as completed however it ends, unwinding included.
struct CompletionGuard(Arc<ScanProgress>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.0.completed.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub submitted: usize,
    pub found: usize,
    pub failed: usize,
    pub panicked: usize,
}

impl ScanSummary {
    pub fn completed(&self) -> usize {
        self.found + self.failed + self.panicked
    }
}

/// A dispatched scan.
///
/// Dropping the handle without draining detaches the jobs; they still run to completion.
#[derive(Debug)]
pub struct ScanHandle {
    jobs: JoinSet<JobOutcome>,
    progress: Arc<ScanProgress>,
}

impl ScanHandle {
    pub fn progress(&self) -> Arc<ScanProgress> {
        self.progress.clone()
    }

    /// Waits for every submitted job to finish.
    pub async fn drain(mut self) -> ScanSummary {
        let mut summary = ScanSummary {
            submitted: self.progress.submitted,
            ..ScanSummary::default()
        };

        while let Some(joined) = self.jobs.join_next().await {
            match joined {
                Ok(JobOutcome::Found) => summary.found += 1,
                Ok(JobOutcome::Missed) => summary.failed += 1,
                Err(e) => {
                    debug!("Probe job ended abnormally: {e}");
                    summary.panicked += 1;
                }
            }
        }

        summary
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.jobs.detach_all();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeFailure;
    use crate::sink::{DeviceRegistry, DiscoveryResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Records every call and answers from a fixed set of live addresses.
    #[derive(Default)]
    struct RecordingProbe {
        live: Vec<Ipv4Addr>,
        calls: Mutex<HashMap<Ipv4Addr, usize>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl Prober for RecordingProbe {
        async fn probe(&self, addr: Ipv4Addr) -> Result<(), ProbeFailure> {
            *self.calls.lock().unwrap().entry(addr).or_default() += 1;

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            // Uneven latency so jobs finish out of order.
            let jitter = u64::from(addr.octets()[3] % 5);
            tokio::time::sleep(self.delay + Duration::from_millis(jitter)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.live.contains(&addr) {
                Ok(())
            } else {
                Err(ProbeFailure::Timeout)
            }
        }
    }

    struct PanickingProbe;

    #[async_trait]
    impl Prober for PanickingProbe {
        async fn probe(&self, addr: Ipv4Addr) -> Result<(), ProbeFailure> {
            if addr.octets()[3] % 2 == 0 {
                panic!("probe exploded on {addr}");
            }
            Ok(())
        }
    }

    /// Holds every probe until the gate opens.
    #[derive(Default)]
    struct GatedProbe {
        started: AtomicUsize,
        open: AtomicBool,
        gate: Notify,
    }

    impl GatedProbe {
        fn release(&self) {
            self.open.store(true, Ordering::SeqCst);
            self.gate.notify_waiters();
        }
    }

    #[async_trait]
    impl Prober for GatedProbe {
        async fn probe(&self, _addr: Ipv4Addr) -> Result<(), ProbeFailure> {
            self.started.fetch_add(1, Ordering::SeqCst);
            loop {
                // Register before checking the flag so a release in between is not lost.
                let notified = self.gate.notified();
                if self.open.load(Ordering::SeqCst) {
                    return Ok(());
                }
                notified.await;
            }
        }
    }

    async fn wait_until(what: &str, done: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
    }

    fn targets(count: u8) -> Vec<Ipv4Addr> {
        (1..=count).map(|d| Ipv4Addr::new(10, 0, 0, d)).collect()
    }

    fn dispatcher(pool_size: usize) -> Dispatcher {
        Dispatcher::new(Config {
            pool_size,
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn dispatcher_rejects_empty_pool() {
        let result = Dispatcher::new(Config {
            pool_size: 0,
            ..Config::default()
        });
        assert_eq!(result.unwrap_err(), ConfigError::ZeroPoolSize);
    }

    #[tokio::test]
    async fn every_target_is_probed_exactly_once() {
        let probe = Arc::new(RecordingProbe {
            delay: Duration::from_millis(5),
            ..RecordingProbe::default()
        });
        let sink = Arc::new(DeviceRegistry::new("test"));

        let handle = dispatcher(4).dispatch(targets(50), probe.clone(), sink);
        let summary = handle.drain().await;

        let calls = probe.calls.lock().unwrap();
        assert_eq!(calls.len(), 50);
        assert!(calls.values().all(|&n| n == 1));
        assert_eq!(summary.submitted, 50);
        assert_eq!(summary.completed(), 50);
        assert_eq!(summary.failed, 50);
    }

    #[tokio::test]
    async fn pool_size_bounds_concurrent_probes() {
        let probe = Arc::new(RecordingProbe {
            delay: Duration::from_millis(10),
            ..RecordingProbe::default()
        });
        let sink = Arc::new(DeviceRegistry::new("test"));

        dispatcher(4)
            .dispatch(targets(50), probe.clone(), sink)
            .drain()
            .await;

        let max = probe.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 4, "saw {max} probes in flight");
        assert!(max >= 1);
    }

    #[tokio::test]
    async fn only_successful_probes_reach_the_sink() {
        let live = vec![Ipv4Addr::new(10, 0, 0, 3), Ipv4Addr::new(10, 0, 0, 7)];
        let probe = Arc::new(RecordingProbe {
            live: live.clone(),
            ..RecordingProbe::default()
        });
        let reported = Arc::new(Mutex::new(Vec::new()));
        let reported_ref = reported.clone();
        let sink = Arc::new(move |r: DiscoveryResult| reported_ref.lock().unwrap().push(r));

        let summary = dispatcher(3).dispatch(targets(10), probe, sink).drain().await;

        let mut hosts: Vec<Ipv4Addr> =
            reported.lock().unwrap().iter().map(|r| r.hostname).collect();
        hosts.sort();
        assert_eq!(hosts, live);
        assert_eq!(summary.found, 2);
        assert_eq!(summary.failed, 8);
    }

    #[tokio::test]
    async fn reports_carry_configured_defaults() {
        let probe = Arc::new(RecordingProbe {
            live: vec![Ipv4Addr::new(10, 0, 0, 1)],
            ..RecordingProbe::default()
        });
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let cfg = Config {
            default_port: 8080,
            default_credential: "secret".to_string(),
            default_refresh_interval: 30,
            ..Config::default()
        };

        Dispatcher::new(cfg)
            .unwrap()
            .dispatch(targets(1), probe, Arc::new(tx))
            .drain()
            .await;

        let result = rx.recv().await.unwrap();
        assert_eq!(result.hostname, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(result.port, 8080);
        assert_eq!(result.password, "secret");
        assert_eq!(result.refresh_interval, 30);
    }

    #[tokio::test]
    async fn panicking_job_does_not_stop_siblings() {
        let registry = Arc::new(DeviceRegistry::new("test"));

        let summary = dispatcher(2)
            .dispatch(targets(10), Arc::new(PanickingProbe), registry.clone())
            .drain()
            .await;

        assert_eq!(summary.panicked, 5);
        assert_eq!(summary.found, 5);
        assert_eq!(registry.len(), 5);
    }

    #[tokio::test]
    async fn progress_counts_every_finished_job() {
        let probe = Arc::new(RecordingProbe::default());
        let registry = Arc::new(DeviceRegistry::default());
        let handle = dispatcher(8).dispatch(targets(20), probe, registry);
        let progress = handle.progress();

        assert_eq!(progress.submitted(), 20);
        handle.drain().await;
        assert_eq!(progress.completed(), 20);
    }

    #[tokio::test]
    async fn empty_target_list_drains_immediately() {
        let probe = Arc::new(RecordingProbe::default());
        let summary = dispatcher(4)
            .dispatch(Vec::new(), probe, Arc::new(DeviceRegistry::default()))
            .drain()
            .await;

        assert_eq!(summary, ScanSummary::default());
    }

    #[tokio::test]
    async fn dispatch_returns_before_any_job_finishes() {
        let probe = Arc::new(GatedProbe::default());
        let registry = Arc::new(DeviceRegistry::new("test"));

        let handle = dispatcher(3).dispatch(targets(10), probe.clone(), registry.clone());
        let progress = handle.progress();
        assert_eq!(progress.submitted(), 10);
        assert_eq!(progress.completed(), 0);

        wait_until("the pool to fill", || probe.started.load(Ordering::SeqCst) == 3).await;
        // Give queued jobs a chance to sneak past the pool.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(probe.started.load(Ordering::SeqCst), 3);
        assert_eq!(progress.completed(), 0);
        assert!(registry.is_empty());

        probe.release();
        let summary = handle.drain().await;

        assert_eq!(summary.found, 10);
        assert_eq!(probe.started.load(Ordering::SeqCst), 10);
        assert_eq!(registry.len(), 10);
    }

    #[tokio::test]
    async fn dropped_handle_lets_jobs_run_to_completion() {
        let live = vec![
            Ipv4Addr::new(10, 0, 0, 2),
            Ipv4Addr::new(10, 0, 0, 9),
            Ipv4Addr::new(10, 0, 0, 17),
        ];
        let probe = Arc::new(RecordingProbe {
            live: live.clone(),
            delay: Duration::from_millis(5),
            ..RecordingProbe::default()
        });
        let registry = Arc::new(DeviceRegistry::new("test"));

        let handle = dispatcher(4).dispatch(targets(20), probe.clone(), registry.clone());
        let progress = handle.progress();
        drop(handle);

        wait_until("every job to finish", || progress.completed() == 20).await;

        assert_eq!(registry.len(), live.len());
        assert_eq!(probe.calls.lock().unwrap().len(), 20);
    }
}
