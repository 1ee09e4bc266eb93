//! Building blocks used by the pipeline stages
//!
//! ## Categories
//!
//! - **acquire**: single fetch attempts, backends, retry and fallback
//! - **build**: archive extraction
//! - **install**: tree builder and template installer
//! - **internal**: filesystem, hashing, URLs, progress, external commands

pub mod acquire;
pub mod build;
pub mod install;
pub mod internal;
