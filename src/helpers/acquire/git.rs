//! Git backend
//!
//! Clones into a scratch directory and copies the working copy into the
//! destination without VCS metadata. The destination only ever receives
//! checked-out files, never a `.git` directory or `.git` file.

use crate::core::output;
use crate::helpers::internal::cmd::ToolCmd;
use crate::helpers::internal::fs_utils::copy_tree_filtered;
use crate::helpers::internal::progress::ProgressGuard;
use crate::helpers::internal::url_utils::{
    GIT_SCHEMES, extract_repo_name, sanitize_filename, validate_url_scheme,
};
use anyhow::{Context, Result};
use std::path::Path;

/// True for entries that must not leave the scratch clone.
pub fn is_vcs_metadata(entry: &walkdir::DirEntry) -> bool {
    entry.file_name() == ".git"
}

/// Clone `url` with `git` and copy its contents into `dest`.
///
/// `url` is a remote URL or the path of a local repository. Returns the
/// number of files copied.
pub fn clone_into(git: &Path, url: &str, dest: &Path) -> Result<usize> {
    if !Path::new(url).is_dir() {
        validate_url_scheme(url, GIT_SCHEMES).context("unsupported git URL")?;
    }

    let repo_name = sanitize_filename(&extract_repo_name(url));
    let scratch = tempfile::tempdir().context("cannot create temporary clone directory")?;
    let checkout = scratch.path().join(&repo_name);

    output::detail(&format!("git clone {}", url));
    {
        let _guard = ProgressGuard::spinner(&format!("cloning {}", repo_name));
        ToolCmd::new(git)
            .args(["clone", "--depth", "1", url])
            .arg(&checkout)
            .run()
            .with_context(|| format!("git clone failed for {}", url))?;
    }

    copy_checkout(&checkout, dest)
}

/// Copy a checked-out tree into `dest`, skipping `.git` entries at any depth.
pub fn copy_checkout(checkout: &Path, dest: &Path) -> Result<usize> {
    let copied = copy_tree_filtered(checkout, dest, is_vcs_metadata)
        .with_context(|| format!("cannot copy clone into {}", dest.display()))?;
    output::detail(&format!("copied {} files to {}", copied, dest.display()));
    Ok(copied)
}
