//! External tool preflight
//!
//! Checks only the tools the current options will actually invoke: the
//! archiver (unless extraction is native), the selected command-line
//! downloader, and `git` when a git-backed component is enabled. Missing tools
//! are reported with an install hint for the host platform and stop `build`.

use super::component::{Component, SourceKind};
use super::error::BuildError;
use super::options::{BuildOptions, is_bare_command};
use crate::helpers::acquire::Backend;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// A tool the build may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Archiver,
    Curl,
    Wget,
    Git,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Archiver => "7z",
            Self::Curl => "curl",
            Self::Wget => "wget",
            Self::Git => "git",
        }
    }

    /// `build.ini` key that overrides this tool's location.
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Archiver => "7za_path",
            Self::Curl => "curl_path",
            Self::Wget => "wget_path",
            Self::Git => "git_path",
        }
    }

    /// How to install the tool on the current host.
    pub fn install_hint(&self) -> String {
        let package = match self {
            Self::Archiver if cfg!(target_os = "macos") => "p7zip",
            Self::Archiver => "p7zip-full",
            other => other.name(),
        };
        if cfg!(windows) {
            format!(
                "place the executable under system/tools or set {} in build.ini",
                self.config_key()
            )
        } else if cfg!(target_os = "macos") {
            format!("brew install {}", package)
        } else {
            format!("apt install {} (or dnf install {})", package, package)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
}

/// Result of a single tool check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub tool: Tool,
    pub configured: PathBuf,
    pub status: CheckStatus,
    pub details: String,
}

/// Results of every tool check.
#[derive(Debug, Clone)]
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    pub fn missing(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .collect()
    }

    pub fn print(&self) {
        if self.checks.is_empty() {
            println!("  no external tools required");
            return;
        }
        for check in &self.checks {
            match check.status {
                CheckStatus::Pass => println!(
                    "  {} {}: {}",
                    "✓".green(),
                    check.tool.name(),
                    check.details.dimmed()
                ),
                CheckStatus::Fail => println!(
                    "  {} {}: {}",
                    "✗".red(),
                    check.tool.name(),
                    check.details.red()
                ),
            }
        }
    }

    /// Convert failures into [`BuildError::ToolMissing`].
    pub fn into_result(self) -> Result<(), BuildError> {
        let tools: Vec<String> = self
            .missing()
            .iter()
            .map(|c| c.tool.name().to_string())
            .collect();
        if tools.is_empty() {
            Ok(())
        } else {
            Err(BuildError::ToolMissing { tools })
        }
    }
}

/// Tools the given options will invoke, in a stable order.
pub fn required_tools(options: &BuildOptions) -> Vec<Tool> {
    let mut tools = Vec::new();

    let any_archive = Component::ALL
        .into_iter()
        .any(|c| options.is_enabled(c) && c.kind() == SourceKind::Archive);
    let any_git = Component::ALL
        .into_iter()
        .any(|c| options.is_enabled(c) && c.kind() == SourceKind::Git);

    if any_archive && !options.native_extract {
        tools.push(Tool::Archiver);
    }
    if any_archive {
        match options.download_backend {
            Backend::Curl => tools.push(Tool::Curl),
            Backend::Wget => tools.push(Tool::Wget),
            Backend::Http | Backend::Git => {}
        }
    }
    if any_git {
        tools.push(Tool::Git);
    }
    tools
}

fn configured_path(options: &BuildOptions, tool: Tool) -> &Path {
    match tool {
        Tool::Archiver => &options.tools.archiver,
        Tool::Curl => &options.tools.curl,
        Tool::Wget => &options.tools.wget,
        Tool::Git => &options.tools.git,
    }
}

/// Resolve a configured tool: bare names through `PATH`, anything else as a path.
pub fn locate(configured: &Path) -> Option<PathBuf> {
    let text = configured.to_string_lossy();
    if is_bare_command(&text) {
        which::which(configured).ok()
    } else {
        configured.is_file().then(|| configured.to_path_buf())
    }
}

/// Check every required tool.
pub fn run_preflight(options: &BuildOptions) -> PreflightReport {
    let checks = required_tools(options)
        .into_iter()
        .map(|tool| {
            let configured = configured_path(options, tool).to_path_buf();
            match locate(&configured) {
                Some(found) => CheckResult {
                    tool,
                    configured,
                    status: CheckStatus::Pass,
                    details: found.display().to_string(),
                },
                None => CheckResult {
                    tool,
                    details: format!(
                        "{} not found; {}",
                        configured.display(),
                        tool.install_hint()
                    ),
                    configured,
                    status: CheckStatus::Fail,
                },
            }
        })
        .collect();
    PreflightReport { checks }
}
