//! Unified progress bar helpers
//!
//! Consistent spinner and byte-progress styling for downloads, clones,
//! extractions and packaging.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Standard spinner characters
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard tick interval for spinners
const TICK_INTERVAL_MS: u64 = 80;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("     {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS)
}

fn bytes_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("     {spinner:.cyan} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸━")
}

/// Create a spinner progress bar with standard styling.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(TICK_INTERVAL_MS));
    pb
}

/// Upgrade a spinner to a byte progress bar when content length becomes known.
pub fn upgrade_to_bytes(pb: &ProgressBar, total_bytes: u64) {
    pb.set_length(total_bytes);
    pb.set_style(bytes_style());
}

/// RAII guard that clears a progress bar when dropped, on every exit path.
pub struct ProgressGuard(ProgressBar);

impl ProgressGuard {
    pub fn spinner(message: &str) -> Self {
        Self(create_spinner(message))
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.0
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let pb = create_spinner("test message");
        assert!(!pb.is_finished());
        pb.finish_and_clear();
        assert!(pb.is_finished());
    }

    #[test]
    fn test_upgrade_to_bytes() {
        let pb = create_spinner("downloading");
        upgrade_to_bytes(&pb, 1000);
        pb.set_position(500);
        assert_eq!(pb.length(), Some(1000));
        assert_eq!(pb.position(), 500);
        pb.finish_and_clear();
    }

    #[test]
    fn test_progress_guard_clears_on_drop() {
        let pb = {
            let guard = ProgressGuard::spinner("test");
            assert!(!guard.bar().is_finished());
            guard.bar().clone()
        };
        assert!(pb.is_finished());
    }
}
