//! Tree layout, version marker files and version-string patching

use crate::core::StageReport;
use crate::core::manifest::{self, EMULATORS_NAMES, RETROBAT_TREE, SYSTEMS_NAMES, VERSION_PATCH};
use crate::core::output;
use crate::helpers::install::tree;
use crate::helpers::internal::fs_utils::{ensure_parent_dir, resolve_under};
use std::path::Path;

/// Placeholder replaced by the version tag in patched files.
pub const VERSION_TOKEN: &str = "@RETROBAT_VERSION@";

/// Files that receive the version tag, relative to the tree root.
pub const VERSION_FILES: [&str; 2] = ["system/version.info", "emulationstation/version.info"];

pub fn create_tree(root: &Path) -> StageReport {
    tree::build_from_manifest(root, &manifest::manifest_path(root, RETROBAT_TREE))
}

/// `emulators/<name>` per emulator, `roms/<name>` and `saves/<name>` per system.
pub fn create_folders(root: &Path) -> StageReport {
    let mut report = tree::build_named(
        root,
        &manifest::manifest_path(root, EMULATORS_NAMES),
        &["emulators"],
    );
    report += tree::build_named(
        root,
        &manifest::manifest_path(root, SYSTEMS_NAMES),
        &["roms", "saves"],
    );
    report
}

pub fn write_version_files(root: &Path, tag: &str) -> StageReport {
    let mut report = StageReport::default();
    for rel in VERSION_FILES {
        let path = root.join(rel);
        let result = ensure_parent_dir(&path).and_then(|()| {
            std::fs::write(&path, tag).map_err(anyhow::Error::from)
        });
        match result {
            Ok(()) => {
                output::detail(&format!("{} = {}", rel, tag));
                report.done += 1;
            }
            Err(e) => {
                output::error(&format!("cannot write {}: {:#}", path.display(), e));
                report.failed += 1;
            }
        }
    }
    report
}

/// Replace [`VERSION_TOKEN`] in every file listed in `version_patch.lst`.
///
/// Files without the token are left untouched and counted as skipped.
pub fn patch_versions(root: &Path, tag: &str) -> StageReport {
    let mut report = StageReport::default();
    let list = manifest::manifest_path(root, VERSION_PATCH);
    let Some(files) = manifest::read_names(&list) else {
        output::info(&format!("manifest {} not found, nothing to patch", list.display()));
        return report;
    };

    for rel in files {
        let Some(path) = resolve_under(root, &rel) else {
            output::warning(&format!("skipping unsafe patch entry '{}'", rel));
            report.skipped += 1;
            continue;
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                output::error(&format!("cannot read {}: {}", path.display(), e));
                report.failed += 1;
                continue;
            }
        };

        if !content.contains(VERSION_TOKEN) {
            output::skip(&format!("{} has no version token, skipping", rel));
            report.skipped += 1;
            continue;
        }

        match std::fs::write(&path, content.replace(VERSION_TOKEN, tag)) {
            Ok(()) => {
                output::detail(&format!("patched {}", rel));
                report.done += 1;
            }
            Err(e) => {
                output::error(&format!("cannot write {}: {}", path.display(), e));
                report.failed += 1;
            }
        }
    }
    report
}
