//! Progress reporting for archive extraction.
//!
//! This implementation relies heavily on the `indicatif` crate, see <https://docs.rs/indicatif>

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

/// Tracks how many compressed bytes of an archive have been expanded.
pub struct ExtractionProgress {
    /// Compressed bytes in the whole archive
    pub total: usize,
    /// Bytes written to disk so far
    pub written: usize,
    progress_bar: ProgressBar,
}

impl ExtractionProgress {
    pub fn new(total: usize) -> color_eyre::Result<Self> {
        // https://docs.rs/indicatif/latest/indicatif/index.html#templates
        let style = ProgressStyle::with_template(
            "{wide_bar} {binary_bytes}/{binary_total_bytes} {msg}\n[est. {eta} remaining]",
        )?;
        let progress_bar = ProgressBar::new(total as u64).with_style(style);
        // The default is 20hz, this reduces rendering overhead
        progress_bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(8));
        Ok(Self {
            total,
            written: 0,
            progress_bar,
        })
    }

    /// Called after every entry, `compressed` bytes were read and `written` bytes produced.
    pub fn entry_done(&mut self, name: &str, compressed: usize, written: usize) {
        self.written += written;
        self.progress_bar.set_message(name.to_string());
        self.progress_bar.inc(compressed as u64);
    }

    pub fn finish(self) {
        self.progress_bar.finish_and_clear();
        let elapsed = self.progress_bar.elapsed();
        info!(
            "expanded {} into {} in {} ({}/s avg)",
            fmt_size(self.total as f64),
            fmt_size(self.written as f64),
            fmt_duration(elapsed),
            fmt_size(self.written as f64 / elapsed.as_secs_f64().max(f64::EPSILON))
        );
    }
}

/// Binary sizes: plain bytes below 1 KiB, two decimals above.
pub fn fmt_size(size_in_bytes: f64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if size_in_bytes < 1024.0 {
        return format!("{:.0}B", size_in_bytes.max(0.0));
    }
    let mut scaled = size_in_bytes / 1024.0;
    let mut unit = 0;
    while scaled >= 1024.0 && unit + 1 < UNITS.len() {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{scaled:.2}{}", UNITS[unit])
}

/// `1m 5s`, `2.50s` or `7.00ms`, whichever unit fits.
fn fmt_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    let minutes = duration.as_secs() / 60;
    if minutes > 0 {
        format!("{minutes}m {}s", duration.as_secs() % 60)
    } else if secs > 1.0 {
        format!("{secs:.2}s")
    } else {
        format!("{:.2}ms", secs * 1000.0)
    }
}
