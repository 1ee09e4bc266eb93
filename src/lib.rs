//! RetroBat distribution builder
//!
//! Pulls the components of a RetroBat distribution from HTTP mirrors, the
//! libretro build-bot and git repositories, lays them out as a canonical
//! directory tree driven by manifest lists, and packages the tree as a
//! deterministic ZIP with a SHA-256 sidecar.
//!
//! # Example
//!
//! ```ignore
//! use retrobuild::{BuildOptions, Pipeline, SourceFetcher, package};
//!
//! let options = BuildOptions::load(Path::new("build.ini"))?;
//! let fetcher = SourceFetcher::from_options(&options);
//! Pipeline::new(&options, "build", &fetcher).run(&[])?;
//! package(Path::new("build"), Path::new("retrobat.zip"))?;
//! ```
//!
//! # Stages
//!
//! `acquire`, `tree`, `folders`, `lrcores`, `emulators`, `frontend`,
//! `version`, `templates`, `version-patch`. Each is gated by its own flag in
//! `build.ini`. Packaging is a separate step.
//!
//! # Errors
//!
//! Only working-directory setup, configuration, missing tools and packaging
//! failures abort a run ([`BuildError`]). A component that cannot be fetched,
//! or a manifest entry that cannot be realized, is logged and counted in the
//! stage's [`StageReport`].

pub mod core;
pub mod engine;
pub mod helpers;

pub use crate::core::{BuildError, BuildOptions, Component, StageReport, output};
pub use engine::{PackageReport, Pipeline, Stage, package};
pub use helpers::acquire::{Backend, Fetch, FetchTask, Outcome, RetryPolicy, SourceFetcher};
pub use helpers::build::Extractor;
