//! Archive extraction
//!
//! Two strategies share one contract: "extract everything, overwriting, into
//! the destination directory", creating the destination first.
//!
//! - [`Extractor::External`] runs the configured 7-Zip compatible archiver as
//!   `<archiver> x <archive> -o<dest> -y`. This handles `.7z`, `.rar` and
//!   anything else 7-Zip reads.
//! - [`Extractor::Native`] reads `.zip` in-process. Entries whose names would
//!   land outside the destination are skipped.

use crate::core::output;
use crate::helpers::internal::cmd::ToolCmd;
use crate::helpers::internal::progress::ProgressGuard;
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// How archives are unpacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    /// Shell out to a 7-Zip compatible archiver.
    External(PathBuf),
    /// In-process zip decoding.
    Native,
}

impl Extractor {
    /// Extract `archive` into `dest`, creating `dest` if needed.
    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        std::fs::create_dir_all(dest)
            .with_context(|| format!("cannot create destination {}", dest.display()))?;

        let filename = archive
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "archive".to_string());
        let _guard = ProgressGuard::spinner(&format!("extracting {}", filename));

        match self {
            Self::External(archiver) => extract_external(archiver, archive, dest)?,
            Self::Native => {
                if !is_zip(&filename) {
                    bail!(
                        "cannot extract {} natively (zip only); configure 7za_path and disable native_extract",
                        filename
                    );
                }
                let count = extract_zip(archive, dest)?;
                output::detail(&format!("{} entries", count));
            }
        }

        output::detail(&format!("extracted {} to {}", filename, dest.display()));
        Ok(())
    }
}

/// True when the native extractor can read this file name.
pub fn is_zip(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".zip")
}

fn extract_external(archiver: &Path, archive: &Path, dest: &Path) -> Result<()> {
    let mut out_flag = std::ffi::OsString::from("-o");
    out_flag.push(dest.as_os_str());

    ToolCmd::new(archiver)
        .arg("x")
        .arg(archive)
        .arg(out_flag)
        .arg("-y")
        .run()
        .with_context(|| format!("extraction failed for {}", archive.display()))?;
    Ok(())
}

/// Unpack every safe entry. Returns the number of files written.
fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .with_context(|| format!("cannot open {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("{} is not a readable zip", archive_path.display()))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("bad entry #{} in {}", i, archive_path.display()))?;

        let Some(rel) = entry.enclosed_name() else {
            output::skip(&format!("unsafe entry name '{}', skipping", entry.name()));
            continue;
        };
        let target = dest.join(rel);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("cannot create directory {}", target.display()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create directory {}", parent.display()))?;
        }
        let mut out = File::create(&target)
            .with_context(|| format!("cannot create {}", target.display()))?;
        std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("cannot write {}", target.display()))?;
        written += 1;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            // Only permission bits; file-type bits are not meaningful here.
            let _ = std::fs::set_permissions(
                &target,
                std::fs::Permissions::from_mode(mode & 0o7777),
            );
        }
    }

    Ok(written)
}
