//! HTTP download backends
//!
//! `Http` streams through `ureq`; `Curl` and `Wget` run the configured
//! executables. Every backend writes into a scoped temporary directory that is
//! removed when [`fetch_archive`] returns, whatever the outcome.

use super::{Backend, FetchTask};
use crate::core::options::ToolPaths;
use crate::core::output;
use crate::helpers::build::Extractor;
use crate::helpers::internal::cmd::ToolCmd;
use crate::helpers::internal::progress::{ProgressGuard, upgrade_to_bytes};
use crate::helpers::internal::url_utils::extract_filename;
use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 15;
const READ_TIMEOUT_SECS: u64 = 20;

/// Download `task.locator` with its backend and extract it into `task.dest`.
pub fn fetch_archive(task: &FetchTask, tools: &ToolPaths, extractor: &Extractor) -> Result<()> {
    let scratch = tempfile::tempdir().context("cannot create temporary download directory")?;
    let file = scratch.path().join(extract_filename(&task.locator));

    output::detail(&format!("downloading {} ({})", task.locator, task.backend));
    match task.backend {
        Backend::Http => {
            download(&task.locator, &file)?;
        }
        Backend::Curl => curl(&tools.curl, &task.locator, &file)?,
        Backend::Wget => wget(&tools.wget, &task.locator, &file)?,
        Backend::Git => bail!("git sources are cloned, not downloaded: {}", task.locator),
    }

    if !file.is_file() {
        bail!("download produced no file: {}", task.locator);
    }

    extractor.extract(&file, &task.dest)
}

/// Stream a URL to `dest` with the native client. Returns the byte count.
pub fn download(url: &str, dest: &Path) -> Result<u64> {
    let filename = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());
    let guard = ProgressGuard::spinner(&format!("downloading {}", filename));

    let agent = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout_read(Duration::from_secs(READ_TIMEOUT_SECS))
        .build();

    let response = agent.get(url).call().map_err(|e| match e {
        ureq::Error::Status(code, _) => anyhow::anyhow!("download failed: HTTP {} for {}", code, url),
        other => anyhow::anyhow!("download failed for {}: {}", url, other),
    })?;

    if let Some(len) = response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        upgrade_to_bytes(guard.bar(), len);
    }

    let mut file = std::fs::File::create(dest)
        .with_context(|| format!("cannot create {}", dest.display()))?;
    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("read error while downloading {}", url))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .with_context(|| format!("write error for {}", dest.display()))?;
        total_bytes += bytes_read as u64;
        guard.bar().set_position(total_bytes);
    }
    file.flush()?;

    Ok(total_bytes)
}

/// `curl --silent --show-error --fail -L <url> -o <file>`
pub fn curl(tool: &Path, url: &str, dest: &Path) -> Result<()> {
    let _guard = ProgressGuard::spinner(&format!("curl {}", url));
    ToolCmd::new(tool)
        .args(["--silent", "--show-error", "--fail", "-L", url, "-o"])
        .arg(dest)
        .run()
        .with_context(|| format!("curl download failed for {}", url))?;
    Ok(())
}

/// `wget --quiet --no-check-certificate --read-timeout=20 --timeout=15 -t 3 -O <file> <url>`
pub fn wget(tool: &Path, url: &str, dest: &Path) -> Result<()> {
    let _guard = ProgressGuard::spinner(&format!("wget {}", url));
    ToolCmd::new(tool)
        .args([
            "--quiet",
            "--no-check-certificate",
            "--read-timeout=20",
            "--timeout=15",
            "-t",
            "3",
            "-O",
        ])
        .arg(dest)
        .arg(url)
        .run()
        .with_context(|| format!("wget download failed for {}", url))?;
    Ok(())
}
