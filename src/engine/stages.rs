//! The fixed, ordered stage sequence
//!
//! Stages run strictly one after another. Each has a label, an enable
//! predicate over [`BuildOptions`] and a body. A body returns
//! `Err(BuildError)` only for fatal conditions; per-item failures are counted
//! in the [`StageReport`].

use super::Pipeline;
use super::phases::{acquire, install, layout};
use crate::core::component::Component;
use crate::core::manifest;
use crate::core::{BuildError, BuildOptions, StageReport};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Acquire,
    Tree,
    Folders,
    Lrcores,
    Emulators,
    Frontend,
    Version,
    Templates,
    VersionPatch,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 9] = [
        Stage::Acquire,
        Stage::Tree,
        Stage::Folders,
        Stage::Lrcores,
        Stage::Emulators,
        Stage::Frontend,
        Stage::Version,
        Stage::Templates,
        Stage::VersionPatch,
    ];

    /// Short name used on the command line and in log labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Acquire => "acquire",
            Self::Tree => "tree",
            Self::Folders => "folders",
            Self::Lrcores => "lrcores",
            Self::Emulators => "emulators",
            Self::Frontend => "frontend",
            Self::Version => "version",
            Self::Templates => "templates",
            Self::VersionPatch => "version-patch",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Acquire => "Downloading components",
            Self::Tree => "Creating RetroBat tree",
            Self::Folders => "Creating emulator and system folders",
            Self::Lrcores => "Downloading libretro cores",
            Self::Emulators => "Downloading emulators",
            Self::Frontend => "Installing frontend files",
            Self::Version => "Writing version files",
            Self::Templates => "Installing templates",
            Self::VersionPatch => "Patching version strings",
        }
    }

    pub fn enabled(&self, options: &BuildOptions) -> bool {
        match self {
            Self::Acquire => Component::PACKAGES
                .into_iter()
                .any(|c| options.is_enabled(c)),
            Self::Tree => options.stages.tree,
            Self::Folders => options.stages.folders,
            Self::Lrcores => options.is_enabled(Component::Lrcores),
            Self::Emulators => options.is_enabled(Component::Emulators),
            Self::Frontend => options.stages.frontend,
            Self::Version => options.stages.version_files,
            Self::Templates => options.stages.templates,
            Self::VersionPatch => options.stages.version_patch,
        }
    }

    pub fn run(&self, pipeline: &Pipeline<'_>) -> Result<StageReport, BuildError> {
        let root = pipeline.root();

        match self {
            Self::Acquire => super::prepare_working_tree(root)?,
            _ => super::ensure_root(root)?,
        }

        let report = match self {
            Self::Acquire => acquire::acquire_packages(pipeline),
            Self::Tree => layout::create_tree(root),
            Self::Folders => layout::create_folders(root),
            Self::Lrcores => {
                acquire::acquire_named(pipeline, Component::Lrcores, manifest::LRCORES_NAMES)
            }
            Self::Emulators => {
                acquire::acquire_named(pipeline, Component::Emulators, manifest::EMULATORS_NAMES)
            }
            Self::Frontend => {
                install::install_manifest(pipeline, manifest::FRONTEND_FILES)
            }
            Self::Version => layout::write_version_files(root, &pipeline.options().version_tag()),
            Self::Templates => install::install_manifest(pipeline, manifest::TEMPLATES),
            Self::VersionPatch => {
                layout::patch_versions(root, &pipeline.options().version_tag())
            }
        };
        Ok(report)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
