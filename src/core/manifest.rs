//! List-based manifests under `system/configgen`
//!
//! Two shapes exist: one relative path (or name) per line, and
//! `source|destination` pairs. Blank lines and lines of the wrong shape are
//! skipped. A missing manifest is reported as `None` so the calling stage can
//! log it and return cleanly.

use std::path::Path;

/// Directory holding every manifest, relative to the tree root.
pub const MANIFEST_DIR: &str = "system/configgen";

pub const RETROBAT_TREE: &str = "retrobat_tree.lst";
pub const EMULATORS_NAMES: &str = "emulators_names.lst";
pub const SYSTEMS_NAMES: &str = "systems_names.lst";
pub const LRCORES_NAMES: &str = "lrcores_names.lst";
pub const FRONTEND_FILES: &str = "frontend_files.lst";
pub const TEMPLATES: &str = "templates.lst";
pub const VERSION_PATCH: &str = "version_patch.lst";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    Path(String),
    Pair { source: String, destination: String },
}

/// Path of a manifest under a tree root.
pub fn manifest_path(root: &Path, name: &str) -> std::path::PathBuf {
    root.join(MANIFEST_DIR).join(name)
}

/// Parse a path/name list. Entries are trimmed; blank lines are dropped.
pub fn parse_paths(content: &str) -> Vec<ManifestEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| ManifestEntry::Path(line.to_string()))
        .collect()
}

/// Parse a `source|destination` list.
///
/// Only the first two fields are used. Lines without `|` or with an empty
/// field are dropped.
pub fn parse_pairs(content: &str) -> Vec<ManifestEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('|');
            let source = fields.next()?.trim();
            let destination = fields.next()?.trim();
            (!source.is_empty() && !destination.is_empty()).then(|| ManifestEntry::Pair {
                source: source.to_string(),
                destination: destination.to_string(),
            })
        })
        .collect()
}

/// Read a path list, or `None` when the file is absent or unreadable.
pub fn read_paths(path: &Path) -> Option<Vec<ManifestEntry>> {
    std::fs::read_to_string(path).ok().map(|c| parse_paths(&c))
}

/// Read a pair list, or `None` when the file is absent or unreadable.
pub fn read_pairs(path: &Path) -> Option<Vec<ManifestEntry>> {
    std::fs::read_to_string(path).ok().map(|c| parse_pairs(&c))
}

/// Read a list of bare names (`Path` entries as strings).
pub fn read_names(path: &Path) -> Option<Vec<String>> {
    read_paths(path).map(|entries| {
        entries
            .into_iter()
            .filter_map(|e| match e {
                ManifestEntry::Path(name) => Some(name),
                ManifestEntry::Pair { .. } => None,
            })
            .collect()
    })
}
