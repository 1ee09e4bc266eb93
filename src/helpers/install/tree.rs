//! Declarative directory creation
//!
//! Every operation here is idempotent: an existing directory is logged and
//! left alone, a missing one is created with its ancestors.

use crate::core::StageReport;
use crate::core::manifest;
use crate::core::output;
use crate::helpers::internal::fs_utils::resolve_under;
use std::path::Path;

/// Ensure each relative path exists as a directory under `root`.
pub fn ensure_dirs<I, S>(root: &Path, entries: I) -> StageReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = StageReport::default();

    for entry in entries {
        let entry = entry.as_ref();
        let Some(dir) = resolve_under(root, entry) else {
            if !entry.trim().is_empty() {
                output::warning(&format!("skipping unsafe tree entry '{}'", entry));
                report.skipped += 1;
            }
            continue;
        };

        if dir.is_dir() {
            output::skip(&format!("{} already exists, skipping", dir.display()));
            report.skipped += 1;
            continue;
        }

        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                output::detail(&format!("created {}", dir.display()));
                report.done += 1;
            }
            Err(e) => {
                output::error(&format!("cannot create {}: {}", dir.display(), e));
                report.failed += 1;
            }
        }
    }

    report
}

/// Create every directory listed in a path manifest.
///
/// A missing manifest is logged and creates nothing.
pub fn build_from_manifest(root: &Path, manifest_file: &Path) -> StageReport {
    let Some(entries) = manifest::read_names(manifest_file) else {
        output::info(&format!(
            "manifest {} not found, nothing to create",
            manifest_file.display()
        ));
        return StageReport::default();
    };
    ensure_dirs(root, entries)
}

/// Create `<prefix>/<name>` for every name in a name manifest and every prefix.
pub fn build_named(root: &Path, manifest_file: &Path, prefixes: &[&str]) -> StageReport {
    let Some(names) = manifest::read_names(manifest_file) else {
        output::info(&format!(
            "manifest {} not found, nothing to create",
            manifest_file.display()
        ));
        return StageReport::default();
    };

    let entries = names.iter().flat_map(|name| {
        prefixes
            .iter()
            .map(move |prefix| format!("{}/{}", prefix, name))
    });
    ensure_dirs(root, entries)
}
