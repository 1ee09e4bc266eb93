//! Per-stage item counts

use std::fmt;
use std::ops::AddAssign;

/// Items handled by one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageReport {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl StageReport {
    pub fn total(&self) -> usize {
        self.done + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl AddAssign for StageReport {
    fn add_assign(&mut self, other: Self) {
        self.done += other.done;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} done, {} skipped, {} failed",
            self.done, self.skipped, self.failed
        )
    }
}
