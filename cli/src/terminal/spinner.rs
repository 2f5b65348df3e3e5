use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use lanprobe_core::scanner::ScanProgress;
use tokio::task::JoinHandle;

const TICK_RATE: Duration = Duration::from_millis(100);

/// The spinner currently on screen, if any. Log lines are printed above it.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

pub struct SpinnerHandle {
    spinner: ProgressBar,
    updater: JoinHandle<()>,
}

impl SpinnerHandle {
    pub fn finish_and_clear(self) {
        self.updater.abort();
        self.spinner.finish_and_clear();
        ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

/// Shows probe progress until the handle is finished.
pub fn start_scan_spinner(progress: Arc<ScanProgress>) -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(TICK_RATE);
    *ACTIVE.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb.clone());

    let pb_clone = pb.clone();
    let updater = tokio::spawn(async move {
        loop {
            let done = progress.completed();
            let total = progress.submitted();
            pb_clone.set_message(format!(
                "Probed {} of {} addresses...",
                done.to_string().green().bold(),
                total
            ));
            if done >= total {
                break;
            }
            tokio::time::sleep(TICK_RATE).await;
        }
    });

    SpinnerHandle {
        spinner: pb,
        updater,
    }
}

/// Routes log output around the spinner so lines do not tear.
pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            Some(spinner) => spinner.println(msg),
            None => eprintln!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
