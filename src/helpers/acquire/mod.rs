//! Source acquisition
//!
//! A [`FetchTask`] names one locator, one destination directory and one
//! backend. [`SourceFetcher`] performs exactly one attempt per call and never
//! retries; bounded retries and the fallback mirror live in [`retry`].
//!
//! ## Backends
//!
//! - **Http**: native `ureq` client with a progress bar
//! - **Curl** / **Wget**: the configured executables
//! - **Git**: clone into a scratch directory, copy without `.git`
//!
//! The three HTTP backends all download into a scoped temporary directory and
//! hand the file to the configured [`Extractor`].

pub mod git;
pub mod http;
pub mod retry;

use crate::core::options::{BuildOptions, ToolPaths};
use crate::helpers::build::Extractor;
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

pub use retry::{Outcome, RetryPolicy, acquire};

/// Transport used for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Http,
    Curl,
    Wget,
    Git,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "http",
            Self::Curl => "curl",
            Self::Wget => "wget",
            Self::Git => "git",
        })
    }
}

/// One download/clone unit. Built fresh for every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub locator: String,
    pub dest: PathBuf,
    pub backend: Backend,
}

impl FetchTask {
    pub fn new(locator: impl Into<String>, dest: impl Into<PathBuf>, backend: Backend) -> Self {
        Self {
            locator: locator.into(),
            dest: dest.into(),
            backend,
        }
    }
}

/// A single acquisition attempt.
///
/// Implemented by [`SourceFetcher`]; tests substitute in-process fakes.
pub trait Fetch {
    fn fetch(&self, task: &FetchTask) -> Result<()>;
}

/// Fetcher backed by the network, the configured tools and an extractor.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    pub tools: ToolPaths,
    pub extractor: Extractor,
}

impl SourceFetcher {
    pub fn new(tools: ToolPaths, extractor: Extractor) -> Self {
        Self { tools, extractor }
    }

    pub fn from_options(options: &BuildOptions) -> Self {
        Self::new(options.tools.clone(), options.extractor())
    }
}

impl Fetch for SourceFetcher {
    fn fetch(&self, task: &FetchTask) -> Result<()> {
        match task.backend {
            Backend::Git => git::clone_into(&self.tools.git, &task.locator, &task.dest).map(|_| ()),
            Backend::Http | Backend::Curl | Backend::Wget => {
                http::fetch_archive(task, &self.tools, &self.extractor)
            }
        }
    }
}
