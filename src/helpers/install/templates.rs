//! `source|destination` installation
//!
//! Each manifest pair is resolved once to an [`InstallSource`] and realized by
//! exactly one of archive extraction, recursive directory copy or file copy.
//! Both sides of a pair are relative to the tree root. Copies overwrite.

use crate::core::StageReport;
use crate::core::manifest::{self, ManifestEntry};
use crate::core::output;
use crate::helpers::build::Extractor;
use crate::helpers::internal::fs_utils::{copy_dir_recursive, copy_file, resolve_under};
use anyhow::{Context, Result};
use std::path::Path;

const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".7z", ".zip", ".rar", ".tar", ".tar.gz", ".tgz", ".tar.xz", ".txz", ".tar.bz2", ".tbz2",
    ".tar.zst", ".tzst",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSource {
    File,
    Directory,
    Archive,
}

impl InstallSource {
    /// Classify an existing path; `None` when it does not exist.
    pub fn classify(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(Self::Directory);
        }
        if !path.is_file() {
            return None;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if ARCHIVE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            Some(Self::Archive)
        } else {
            Some(Self::File)
        }
    }
}

/// Install one pair. Returns `Ok(false)` when the source is missing.
pub fn install_pair(
    root: &Path,
    source: &str,
    destination: &str,
    extractor: &Extractor,
) -> Result<bool> {
    let src = resolve_under(root, source)
        .with_context(|| format!("unsafe source path '{}'", source))?;
    let dest = resolve_under(root, destination)
        .with_context(|| format!("unsafe destination path '{}'", destination))?;

    let Some(kind) = InstallSource::classify(&src) else {
        return Ok(false);
    };

    match kind {
        InstallSource::Archive => {
            extractor.extract(&src, &dest)?;
        }
        InstallSource::Directory => {
            let copied = copy_dir_recursive(&src, &dest)?;
            output::detail(&format!(
                "copied {} ({} files) to {}",
                source,
                copied,
                dest.display()
            ));
        }
        InstallSource::File => {
            copy_file(&src, &dest)?;
            output::detail(&format!("copied {} to {}", source, dest.display()));
        }
    }
    Ok(true)
}

/// Install every pair listed in `manifest_file`.
///
/// Missing sources and failed entries are logged and counted; later entries
/// still run. A missing manifest installs nothing.
pub fn install_from_manifest(
    root: &Path,
    manifest_file: &Path,
    extractor: &Extractor,
) -> StageReport {
    let mut report = StageReport::default();

    let Some(entries) = manifest::read_pairs(manifest_file) else {
        output::info(&format!(
            "manifest {} not found, nothing to install",
            manifest_file.display()
        ));
        return report;
    };

    for entry in entries {
        let ManifestEntry::Pair {
            source,
            destination,
        } = entry
        else {
            continue;
        };

        match install_pair(root, &source, &destination, extractor) {
            Ok(true) => report.done += 1,
            Ok(false) => {
                output::error(&format!("source not found: {}", source));
                report.failed += 1;
            }
            Err(e) => {
                output::error(&format!("cannot install {}: {:#}", source, e));
                report.failed += 1;
            }
        }
    }

    report
}
