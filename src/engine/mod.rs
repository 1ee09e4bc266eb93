//! Pipeline orchestration
//!
//! [`Pipeline`] runs the [`Stage`] sequence against one working tree. Options
//! are borrowed read-only for the whole run; the fetcher and extractor are
//! injected so the same sequence runs against the network or against fakes.

pub mod package;
mod phases;
pub mod stages;

pub use package::{PackageReport, archive_name, package, sidecar_path};
pub use phases::acquire::tasks_for;
pub use phases::layout::{VERSION_FILES, VERSION_TOKEN};
pub use stages::Stage;

use crate::core::output;
use crate::core::{BuildError, BuildOptions, StageReport};
use crate::helpers::acquire::{Fetch, RetryPolicy};
use crate::helpers::build::Extractor;
use crate::helpers::internal::fs_utils::is_non_empty_dir;
use std::path::{Path, PathBuf};

pub struct Pipeline<'a> {
    options: &'a BuildOptions,
    root: PathBuf,
    fetcher: &'a dyn Fetch,
    extractor: Extractor,
    policy: RetryPolicy,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline. Retry policy and extractor follow `options`.
    pub fn new(options: &'a BuildOptions, root: impl Into<PathBuf>, fetcher: &'a dyn Fetch) -> Self {
        Self {
            options,
            root: root.into(),
            fetcher,
            extractor: options.extractor(),
            policy: RetryPolicy::new(options.retry_attempts, options.retry_delay),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        self.options
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fetcher(&self) -> &dyn Fetch {
        self.fetcher
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run every enabled stage in order, or only the stages in `only` when it
    /// is non-empty. Stops at the first fatal error.
    pub fn run(&self, only: &[Stage]) -> Result<Vec<(Stage, StageReport)>, BuildError> {
        let mut reports = Vec::new();

        for stage in Stage::ALL {
            if !only.is_empty() && !only.contains(&stage) {
                continue;
            }
            if !stage.enabled(self.options) {
                output::skip(&format!("{} disabled, skipping", stage));
                continue;
            }

            output::label(stage.name(), stage.label());
            let report = stage.run(self)?;
            if report.has_failures() {
                output::warning(&format!("{}: {}", stage, report));
            } else {
                output::success(&format!("{}: {}", stage, report));
            }
            reports.push((stage, report));
        }

        Ok(reports)
    }
}

/// Delete a non-empty working tree and recreate it empty.
pub fn prepare_working_tree(root: &Path) -> Result<(), BuildError> {
    if is_non_empty_dir(root) {
        output::info(&format!("cleaning {}", root.display()));
        std::fs::remove_dir_all(root).map_err(|e| BuildError::setup(root, e))?;
    }
    ensure_root(root)
}

/// Create the working tree root if it does not exist.
pub fn ensure_root(root: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(root).map_err(|e| BuildError::setup(root, e))
}
