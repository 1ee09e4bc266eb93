//! Laying out the working tree
//!
//! - **tree**: idempotent directory creation from path and name manifests
//! - **templates**: `source|destination` installation (copy or extract)

pub mod templates;
pub mod tree;

pub use templates::{InstallSource, install_from_manifest};
pub use tree::{build_from_manifest, build_named, ensure_dirs};
