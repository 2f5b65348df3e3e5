use colored::*;
use lanprobe_common::config::Config;
use lanprobe_common::network::interface::SystemNetwork;
use lanprobe_core::enumerator::{self, ScanPlan};

use crate::terminal::print;

pub fn targets(cfg: &Config) -> anyhow::Result<()> {
    let network = SystemNetwork::new(cfg.route_probe);
    let plan: ScanPlan = enumerator::enumerate_scan_targets(&network)?;

    print::tree_head(0, &plan.interface);

    let mut details = vec![("Local address".to_string(), plan.local_addr.to_string().cyan())];
    for subnet in &plan.subnets {
        details.push((
            subnet.to_string(),
            format!("{} hosts", subnet.host_count()).normal(),
        ));
    }
    print::as_tree_one_level(details);

    print::fat_separator();
    print::centerln(&format!(
        "{} addresses would be probed",
        plan.targets.len().to_string().bold().green()
    ));
    Ok(())
}
