//! Common filesystem utilities
//!
//! Shared filesystem operations used by the fetchers, installers and packager.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use walkdir::WalkDir;

/// Ensure a file's parent directory exists.
///
/// Creates the parent directory (and all ancestors) if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Copy a file, creating parent directories as needed. Overwrites `dest`.
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
    ensure_parent_dir(dest)?;
    std::fs::copy(src, dest)
        .with_context(|| format!("copy failed: {} -> {}", src.display(), dest.display()))
}

/// Recursively copy `src` into `dest`, overwriting files that already exist.
///
/// Entries for which `skip` returns true are not copied, and directories
/// skipped this way are not descended into. Returns the number of files copied.
pub fn copy_tree_filtered<F>(src: &Path, dest: &Path, skip: F) -> Result<usize>
where
    F: Fn(&walkdir::DirEntry) -> bool,
{
    std::fs::create_dir_all(dest)
        .with_context(|| format!("cannot create directory {}", dest.display()))?;

    let mut copied = 0;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !skip(e));

    for entry in walker {
        let entry = entry.with_context(|| format!("cannot walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", entry.path().display(), src.display()))?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("cannot create directory {}", target.display()))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Recursively copy a directory, overwriting existing files.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<usize> {
    copy_tree_filtered(src, dest, |_| false)
}

/// Trim whitespace and surrounding separators, then map both `/` and `\` to the
/// host separator.
pub fn normalize_separators(path: &str) -> String {
    path.trim()
        .trim_start_matches(['/', '\\'])
        .trim_end_matches(['/', '\\'])
        .replace(['/', '\\'], &MAIN_SEPARATOR.to_string())
}

/// Check if path is safe (no path traversal).
///
/// Rejects absolute paths and paths containing "..".
pub fn is_safe_path(path: &Path) -> bool {
    !path.is_absolute()
        && !path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}

/// Turn one manifest entry into a path under `root`.
///
/// Returns `None` for blank entries and entries that would escape `root`.
pub fn resolve_under(root: &Path, entry: &str) -> Option<PathBuf> {
    let normalized = normalize_separators(entry);
    if normalized.is_empty() {
        return None;
    }
    let rel = PathBuf::from(normalized);
    is_safe_path(&rel).then(|| root.join(rel))
}

/// Convert a relative path to forward-slash form for archive entry names.
pub fn to_slash(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Return true when `dir` exists and has at least one entry.
pub fn is_non_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_parent_dir() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a/b/c/file.txt");

        ensure_parent_dir(&nested).unwrap();
        assert!(temp.path().join("a/b/c").exists());
    }

    #[test]
    fn test_ensure_parent_dir_already_exists() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");

        // Should not error if parent already exists
        ensure_parent_dir(&file).unwrap();
    }

    #[test]
    fn test_copy_file_creates_parents_and_overwrites() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src.txt");
        let dest = temp.path().join("a/b/c/dest.txt");

        std::fs::write(&src, "content").unwrap();
        copy_file(&src, &dest).unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "content");

        std::fs::write(&src, "newer").unwrap();
        copy_file(&src, &dest).unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "newer");
    }

    #[test]
    fn test_copy_dir_recursive() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("x/y")).unwrap();
        std::fs::create_dir_all(src.join("empty")).unwrap();
        std::fs::write(src.join("top.txt"), "1").unwrap();
        std::fs::write(src.join("x/y/deep.txt"), "2").unwrap();

        let dest = temp.path().join("dest");
        let copied = copy_dir_recursive(&src, &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(std::fs::read_to_string(dest.join("x/y/deep.txt")).unwrap(), "2");
        assert!(dest.join("empty").is_dir());
    }

    #[test]
    fn test_copy_tree_filtered_prunes_directories() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("skipme/inner")).unwrap();
        std::fs::write(src.join("skipme/inner/f.txt"), "x").unwrap();
        std::fs::write(src.join("keep.txt"), "y").unwrap();

        let dest = temp.path().join("dest");
        copy_tree_filtered(&src, &dest, |e| e.file_name() == "skipme").unwrap();

        assert!(dest.join("keep.txt").exists());
        assert!(!dest.join("skipme").exists());
    }

    #[test]
    fn test_normalize_separators() {
        let sep = MAIN_SEPARATOR.to_string();
        assert_eq!(normalize_separators("  /roms\\snes/ "), format!("roms{}snes", sep));
        assert_eq!(normalize_separators("\\\\system"), "system");
        assert_eq!(normalize_separators("   "), "");
    }

    #[test]
    fn test_is_safe_path() {
        assert!(is_safe_path(Path::new("foo/bar/baz")));
        assert!(is_safe_path(Path::new("file.txt")));
        assert!(!is_safe_path(Path::new("/absolute/path")));
        assert!(!is_safe_path(Path::new("../escape")));
        assert!(!is_safe_path(Path::new("foo/../bar")));
    }

    #[test]
    fn test_resolve_under() {
        let root = Path::new("/tree");
        assert_eq!(resolve_under(root, "/bios"), Some(root.join("bios")));
        assert_eq!(resolve_under(root, ""), None);
        assert_eq!(resolve_under(root, "../outside"), None);
    }

    #[test]
    fn test_to_slash() {
        let rel = Path::new("a").join("b").join("c.txt");
        assert_eq!(to_slash(&rel), "a/b/c.txt");
    }

    #[test]
    fn test_is_non_empty_dir() {
        let temp = tempdir().unwrap();
        assert!(!is_non_empty_dir(temp.path()));
        std::fs::write(temp.path().join("f"), "").unwrap();
        assert!(is_non_empty_dir(temp.path()));
        assert!(!is_non_empty_dir(&temp.path().join("missing")));
    }
}
