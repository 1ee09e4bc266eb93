//! Build error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a build run.
///
/// Per-item failures inside a stage are logged and counted instead; only the
/// conditions below propagate out of the pipeline.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot prepare working directory {}: {source}", path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("required tools missing: {}", tools.join(", "))]
    ToolMissing { tools: Vec<String> },

    #[error("packaging failed for {}: {message}", archive.display())]
    Package { archive: PathBuf, message: String },
}

impl BuildError {
    pub fn setup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Setup {
            path: path.into(),
            source,
        }
    }

    pub fn package(archive: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Package {
            archive: archive.into(),
            message: message.into(),
        }
    }
}
