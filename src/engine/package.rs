//! Deterministic ZIP packaging with a SHA-256 sidecar
//!
//! The tree is walked in sorted order. Regular files are streamed into
//! Deflate level 9 entries named by their forward-slash relative path;
//! directories holding no regular file and no subdirectory become `name/`
//! entries. Every entry is stamped with the DOS epoch, so the same tree always
//! yields the same bytes. The archive never contains itself. The sidecar is
//! hashed from the closed archive file.

use crate::core::output;
use crate::core::{BuildError, BuildOptions};
use crate::helpers::internal::fs_utils::to_slash;
use crate::helpers::internal::hash::sha256_file;
use crate::helpers::internal::progress::ProgressGuard;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime};

const SIDECAR_SUFFIX: &str = ".sha256.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub archive: PathBuf,
    pub sidecar: PathBuf,
    pub files: usize,
    pub empty_dirs: usize,
    pub sha256: String,
}

/// `retrobat-v<version>-<branch>-<architecture>.zip`
pub fn archive_name(options: &BuildOptions) -> String {
    format!(
        "retrobat-v{}-{}-{}.zip",
        options.retrobat_version, options.branch, options.architecture
    )
}

/// `<archive>.sha256.txt`
pub fn sidecar_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_os_string();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Package `root` into `archive` and write its checksum sidecar.
pub fn package(root: &Path, archive: &Path) -> Result<PackageReport, BuildError> {
    let fail = |message: String| BuildError::package(archive, message);

    if !root.is_dir() {
        return Err(fail(format!("{} is not a directory", root.display())));
    }

    let sidecar = sidecar_path(archive);
    for stale in [archive, sidecar.as_path()] {
        if stale.exists()
            && let Err(e) = std::fs::remove_file(stale)
        {
            output::warning(&format!("cannot delete {}: {}", stale.display(), e));
        }
    }

    if let Some(parent) = archive.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| fail(format!("cannot create {}: {}", parent.display(), e)))?;
    }

    let file = File::create(archive).map_err(|e| fail(format!("cannot create archive: {}", e)))?;
    // Compare canonical paths so an archive written inside the tree is skipped.
    let own_paths: Vec<PathBuf> = [archive.to_path_buf(), sidecar.clone()]
        .into_iter()
        .map(|p| p.canonicalize().unwrap_or(p))
        .collect();

    output::action(&format!("packaging {} -> {}", root.display(), archive.display()));
    let (files, empty_dirs) = {
        let _guard = ProgressGuard::spinner("compressing");
        let mut zip = zip::ZipWriter::new(BufWriter::new(file));
        let counts = write_tree(&mut zip, root, &own_paths).map_err(|e| fail(format!("{:#}", e)))?;

        let writer = zip
            .finish()
            .map_err(|e| fail(format!("cannot finish archive: {}", e)))?;
        let file = writer
            .into_inner()
            .map_err(|e| fail(format!("cannot flush archive: {}", e.error())))?;
        file.sync_all()
            .map_err(|e| fail(format!("cannot sync archive: {}", e)))?;
        counts
    };

    let sha256 = sha256_file(archive).map_err(|e| fail(format!("cannot hash archive: {}", e)))?;
    std::fs::write(&sidecar, &sha256)
        .map_err(|e| fail(format!("cannot write {}: {}", sidecar.display(), e)))?;

    output::success(&format!(
        "{} ({} files, {} empty directories)",
        archive.display(),
        files,
        empty_dirs
    ));
    output::detail(&format!("sha256 {}", sha256));

    Ok(PackageReport {
        archive: archive.to_path_buf(),
        sidecar,
        files,
        empty_dirs,
        sha256,
    })
}

fn is_own_output(path: &Path, own_paths: &[PathBuf]) -> bool {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    own_paths.contains(&canonical)
}

/// True when `dir` holds a subdirectory or a regular file that will be packaged.
///
/// Symlinks and other special files are never packaged, so they do not count.
fn has_entries(dir: &Path, own_paths: &[PathBuf]) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries.filter_map(|e| e.ok()).any(|e| match e.file_type() {
        Ok(t) if t.is_dir() => true,
        Ok(t) if t.is_file() => !is_own_output(&e.path(), own_paths),
        _ => false,
    })
}

fn write_tree<W: Write + std::io::Seek>(
    zip: &mut zip::ZipWriter<W>,
    root: &Path,
    own_paths: &[PathBuf],
) -> anyhow::Result<(usize, usize)> {
    use anyhow::Context;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .last_modified_time(DateTime::default());

    let mut files = 0;
    let mut empty_dirs = 0;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk {}", root.display()))?;
        let path = entry.path();
        let rel = path.strip_prefix(root)?;
        let name = to_slash(rel);

        if entry.file_type().is_dir() {
            if !has_entries(path, own_paths) {
                zip.add_directory(format!("{}/", name), options)
                    .with_context(|| format!("cannot add directory {}", name))?;
                empty_dirs += 1;
            }
            continue;
        }

        if !entry.file_type().is_file() {
            output::skip(&format!("{} is not a regular file, skipping", name));
            continue;
        }
        if is_own_output(path, own_paths) {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let file_options = options.large_file(size >= u32::MAX as u64);
        zip.start_file(name.as_str(), file_options)
            .with_context(|| format!("cannot add {}", name))?;
        let mut input =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        std::io::copy(&mut input, zip).with_context(|| format!("cannot compress {}", name))?;
        files += 1;
    }

    Ok((files, empty_dirs))
}
