//! Progress reporting for TTY and non-TTY environments.
//!
//! TTY mode: an indicatif bar per download plus spinner status lines.
//! Non-TTY mode: everything hidden, logs carry the progress.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Byte bar for a download with known size
fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:<24.dim} {bar:30.green/dim} {binary_bytes:>7}/{binary_total_bytes:7} {eta:>4}")
        .expect("invalid template")
        .progress_chars("--")
}

/// Pending style, shown until the response headers arrive
fn pending_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:<24.dim} {binary_bytes:>7} {wide_msg:.dim}")
        .expect("invalid template")
}

/// Switch a download bar from pending to a sized byte bar.
pub fn upgrade_to_bar(pb: &ProgressBar, total: u64) {
    pb.set_length(total);
    pb.set_style(bar_style());
}

/// Central progress context managing multi-progress bars.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Create new context, detecting TTY automatically.
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    /// Context that never draws anything (tests, piped output).
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: false,
        }
    }

    /// Create a download bar labelled `name`.
    ///
    /// Non-TTY: hidden (no-op).
    pub fn download_bar(&self, name: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new(0));
        pb.set_style(pending_style());
        let display: String = name.chars().take(24).collect();
        pb.set_prefix(display);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Whether running in TTY mode.
    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Get reference to `MultiProgress` for log bridge.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Format number with thousand separators.
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_small() {
        assert_eq!(fmt_num(0), "0");
        assert_eq!(fmt_num(12), "12");
        assert_eq!(fmt_num(999), "999");
    }

    #[test]
    fn fmt_num_thousands() {
        assert_eq!(fmt_num(1_000), "1,000");
        assert_eq!(fmt_num(12_345), "12,345");
        assert_eq!(fmt_num(1_234_567), "1,234,567");
    }

    #[test]
    fn hidden_context_yields_hidden_bars() {
        let ctx = ProgressContext::hidden();
        assert!(!ctx.is_tty());
        assert!(ctx.download_bar("flynn28/college-division-database").is_hidden());
    }
}
