//! Unpacking downloaded sources
//!
//! - **extract**: the external archiver or in-process zip decoding

pub mod extract;

pub use extract::{Extractor, is_zip};
