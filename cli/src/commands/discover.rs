use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use lanprobe_common::config::Config;
use lanprobe_common::network::interface::SystemNetwork;
use lanprobe_core::discovery::DiscoveryService;
use lanprobe_core::network::tcp::TcpProbe;
use lanprobe_core::scanner::ScanSummary;
use lanprobe_core::sink::{DeviceRegistry, DiscoveredDevice};

use crate::terminal::{print, spinner};

type Detail = (String, ColoredString);

pub async fn discover(cfg: &Config) -> anyhow::Result<()> {
    let registry = Arc::new(DeviceRegistry::new(cfg.device_label.clone()));
    let prober = Arc::new(TcpProbe::new(cfg.default_port, cfg.probe_timeout));
    let service = DiscoveryService::new(
        cfg.clone(),
        Box::new(SystemNetwork::new(cfg.route_probe)),
        prober,
        registry.clone(),
    )?;

    let start_time: Instant = Instant::now();
    let handle = service
        .start_scan()
        .context("Discovery aborted before any address was probed")?;

    let spinner_handle = spinner::start_scan_spinner(handle.progress());
    let summary: ScanSummary = handle.drain().await;
    spinner_handle.finish_and_clear();

    discovery_ends(&registry.devices(), &summary, start_time.elapsed());
    Ok(())
}

fn discovery_ends(devices: &[DiscoveredDevice], summary: &ScanSummary, total_time: Duration) {
    if devices.is_empty() {
        print::header("zero devices detected");
        print::no_results();
        return;
    }

    print::header("device discovery");
    for (idx, device) in devices.iter().enumerate() {
        print_device_tree(device, idx);
        if idx + 1 != devices.len() {
            println!();
        }
    }
    print_summary(devices.len(), summary, total_time);
}

fn print_summary(devices_len: usize, summary: &ScanSummary, total_time: Duration) {
    let found: ColoredString = format!("{devices_len} devices").bold().green();
    let probed: ColoredString = format!("{} addresses", summary.completed()).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    print::fat_separator();
    print::centerln(&format!(
        "Discovery Complete: {found} among {probed} in {total_time}"
    ));
}

fn print_device_tree(device: &DiscoveredDevice, idx: usize) {
    print::tree_head(idx, &device.label);

    let props = &device.properties;
    let details: Vec<Detail> = vec![
        ("ID".to_string(), device.id.normal()),
        ("Hostname".to_string(), props.hostname.to_string().cyan()),
        ("Port".to_string(), props.port.to_string().normal()),
        ("Password".to_string(), props.password.as_str().dimmed()),
        ("Refresh".to_string(), format!("{}s", props.refresh_interval).normal()),
    ];

    print::as_tree_one_level(details);
}
