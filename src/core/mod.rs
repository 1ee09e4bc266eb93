//! Core infrastructure: configuration, manifests, tool preflight, logging

pub mod component;
pub mod error;
pub mod ini;
pub mod manifest;
pub mod options;
pub mod output;
pub mod report;
pub mod tools;

pub use component::{Component, SourceKind};
pub use error::BuildError;
pub use options::BuildOptions;
pub use report::StageReport;
