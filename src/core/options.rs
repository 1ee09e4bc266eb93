//! Resolved build options
//!
//! [`BuildOptions`] is read once from `build.ini` and passed by reference to
//! every stage. Nothing mutates it after [`BuildOptions::load`] returns.

use super::component::Component;
use super::error::BuildError;
use super::ini::Ini;
use crate::helpers::acquire::Backend;
use crate::helpers::build::Extractor;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Section holding every build option.
pub const SECTION: &str = "BuilderOptions";

const DEFAULT_FTP: &str = "http://www.retrobat.ovh/repo/";
const DEFAULT_BUILDBOT: &str = "https://buildbot.libretro.com";
const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
const DEFAULT_RETRY_DELAY_SECS: u64 = 3;

/// A primary source template with an optional fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub primary: String,
    pub fallback: Option<String>,
}

/// Configured executable locations (bare names are looked up on `PATH`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub archiver: PathBuf,
    pub curl: PathBuf,
    pub wget: PathBuf,
    pub git: PathBuf,
}

/// Per-stage switches for the layout stages. All default to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageFlags {
    pub tree: bool,
    pub folders: bool,
    pub frontend: bool,
    pub version_files: bool,
    pub templates: bool,
    pub version_patch: bool,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub retrobat_version: String,
    pub retroarch_version: String,
    pub branch: String,
    pub architecture: String,
    enabled: BTreeMap<Component, bool>,
    pub stages: StageFlags,
    pub tools: ToolPaths,
    pub download_backend: Backend,
    pub native_extract: bool,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    /// Base of the RetroBat mirror, bound to `{ftp}` in templates.
    pub ftp: String,
    /// Base of the libretro build-bot, bound to `{buildbot}` in templates.
    pub buildbot: String,
    sources: BTreeMap<Component, Source>,
}

impl BuildOptions {
    /// Load options from an INI file. Relative tool paths resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let ini = Ini::load(path).map_err(|e| BuildError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Self::from_ini(&ini, base_dir).map_err(|message| BuildError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Build options from parsed INI data.
    pub fn from_ini(ini: &Ini, base_dir: &Path) -> Result<Self, String> {
        let get = |key: &str, default: &str| ini.get_or(SECTION, key, default);
        let stage = |key: &str| ini.get(SECTION, key).is_none_or(|v| v == "1");

        let enabled = Component::ALL
            .into_iter()
            .map(|c| (c, ini.flag(SECTION, &c.flag_key())))
            .collect();

        let sources = Component::ALL
            .into_iter()
            .map(|c| {
                let fallback = match ini.get(SECTION, &c.fallback_key()) {
                    Some("") => None,
                    Some(url) => Some(url.to_string()),
                    None => c.default_fallback().map(str::to_string),
                };
                let source = Source {
                    primary: get(c.url_key(), c.default_url()),
                    fallback,
                };
                (c, source)
            })
            .collect();

        let download_backend = match get("download_backend", "http").to_lowercase().as_str() {
            "http" | "webclient" => Backend::Http,
            "curl" => Backend::Curl,
            "wget" => Backend::Wget,
            other => {
                return Err(format!(
                    "unknown download_backend '{}' (expected http, curl or wget)",
                    other
                ));
            }
        };

        let retry_attempts = parse_number(&get("retry_attempts", ""), DEFAULT_RETRY_ATTEMPTS as u64)?
            .clamp(1, 50) as u32;
        let retry_delay = Duration::from_secs(parse_number(
            &get("retry_delay_secs", ""),
            DEFAULT_RETRY_DELAY_SECS,
        )?);

        Ok(Self {
            retrobat_version: get("retrobat_version", ""),
            retroarch_version: get("retroarch_version", ""),
            branch: get("branch", "stable"),
            architecture: get("architecture", default_architecture()),
            enabled,
            stages: StageFlags {
                tree: stage("set_tree"),
                folders: stage("set_folders"),
                frontend: stage("set_frontend"),
                version_files: stage("set_version"),
                templates: stage("set_templates"),
                version_patch: stage("patch_version"),
            },
            tools: ToolPaths {
                archiver: resolve_tool_path(&get("7za_path", default_archiver()), base_dir),
                curl: resolve_tool_path(&get("curl_path", default_tool("curl")), base_dir),
                wget: resolve_tool_path(&get("wget_path", default_tool("wget")), base_dir),
                git: resolve_tool_path(&get("git_path", "git"), base_dir),
            },
            download_backend,
            native_extract: ini.flag(SECTION, "native_extract"),
            retry_attempts,
            retry_delay,
            ftp: get("retrobat_ftp", DEFAULT_FTP),
            buildbot: get("retroarch_url", DEFAULT_BUILDBOT),
            sources,
        })
    }

    pub fn is_enabled(&self, component: Component) -> bool {
        self.enabled.get(&component).copied().unwrap_or(false)
    }

    pub fn source(&self, component: Component) -> Source {
        self.sources.get(&component).cloned().unwrap_or_else(|| Source {
            primary: component.default_url().to_string(),
            fallback: component.default_fallback().map(str::to_string),
        })
    }

    /// Archive extraction strategy selected by `native_extract`.
    pub fn extractor(&self) -> Extractor {
        if self.native_extract {
            Extractor::Native
        } else {
            Extractor::External(self.tools.archiver.clone())
        }
    }

    /// `<version>-<branch>-<architecture>`, written to the version marker files.
    pub fn version_tag(&self) -> String {
        format!(
            "{}-{}-{}",
            self.retrobat_version, self.branch, self.architecture
        )
    }

    /// Build-bot path segment for the target architecture.
    pub fn platform(&self) -> &'static str {
        match self.architecture.as_str() {
            "win32" => "windows/x86",
            "linux-x64" => "linux/x86_64",
            "osx-x64" => "apple/osx/x86_64",
            "osx-arm64" => "apple/osx/arm64",
            _ => "windows/x86_64",
        }
    }

    /// Shared-library extension of libretro cores for the target architecture.
    pub fn core_ext(&self) -> &'static str {
        if self.architecture.starts_with("linux") {
            "so"
        } else if self.architecture.starts_with("osx") {
            "dylib"
        } else {
            "dll"
        }
    }

    /// Substitute template placeholders. `{name}` is bound only when given.
    pub fn render(&self, template: &str, name: Option<&str>) -> String {
        let mut out = template
            .replace("{ftp}", &self.ftp)
            .replace("{buildbot}", self.buildbot.trim_end_matches('/'))
            .replace("{version}", &self.retrobat_version)
            .replace("{retroarch_version}", &self.retroarch_version)
            .replace("{branch}", &self.branch)
            .replace("{arch}", &self.architecture)
            .replace("{platform}", self.platform())
            .replace("{ext}", self.core_ext());
        if let Some(name) = name {
            out = out.replace("{name}", name);
        }
        out
    }

    /// Every option as a `(name, value)` pair, in a fixed order, for logging.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            ("retrobat_version".to_string(), self.retrobat_version.clone()),
            ("retroarch_version".to_string(), self.retroarch_version.clone()),
            ("branch".to_string(), self.branch.clone()),
            ("architecture".to_string(), self.architecture.clone()),
        ];
        for c in Component::ALL {
            entries.push((c.flag_key(), flag_str(self.is_enabled(c))));
        }
        entries.extend([
            ("set_tree".to_string(), flag_str(self.stages.tree)),
            ("set_folders".to_string(), flag_str(self.stages.folders)),
            ("set_frontend".to_string(), flag_str(self.stages.frontend)),
            ("set_version".to_string(), flag_str(self.stages.version_files)),
            ("set_templates".to_string(), flag_str(self.stages.templates)),
            ("patch_version".to_string(), flag_str(self.stages.version_patch)),
            ("7za_path".to_string(), self.tools.archiver.display().to_string()),
            ("curl_path".to_string(), self.tools.curl.display().to_string()),
            ("wget_path".to_string(), self.tools.wget.display().to_string()),
            ("git_path".to_string(), self.tools.git.display().to_string()),
            ("download_backend".to_string(), self.download_backend.to_string()),
            ("native_extract".to_string(), flag_str(self.native_extract)),
            ("retry_attempts".to_string(), self.retry_attempts.to_string()),
            (
                "retry_delay_secs".to_string(),
                self.retry_delay.as_secs().to_string(),
            ),
            ("retrobat_ftp".to_string(), self.ftp.clone()),
            ("retroarch_url".to_string(), self.buildbot.clone()),
        ]);
        for c in Component::ALL {
            let source = self.source(c);
            entries.push((c.url_key().to_string(), source.primary));
            entries.push((c.fallback_key(), source.fallback.unwrap_or_default()));
        }
        entries
    }
}

fn flag_str(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

fn parse_number(value: &str, default: u64) -> Result<u64, String> {
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse::<u64>()
        .map_err(|_| format!("expected a number, got '{}'", value))
}

/// Bare command names (no separator) are left for `PATH` lookup; anything with
/// a separator is taken relative to `base_dir` unless already absolute.
pub fn resolve_tool_path(configured: &str, base_dir: &Path) -> PathBuf {
    if is_bare_command(configured) {
        return PathBuf::from(configured);
    }
    let normalized = crate::helpers::internal::fs_utils::normalize_separators(configured);
    let path = PathBuf::from(configured.trim());
    if path.is_absolute() {
        path
    } else {
        base_dir.join(normalized)
    }
}

pub fn is_bare_command(tool: &str) -> bool {
    !tool.contains('/') && !tool.contains('\\')
}

fn default_architecture() -> &'static str {
    if cfg!(target_os = "macos") {
        if cfg!(target_arch = "aarch64") {
            "osx-arm64"
        } else {
            "osx-x64"
        }
    } else if cfg!(target_os = "linux") {
        "linux-x64"
    } else {
        "win64"
    }
}

fn default_archiver() -> &'static str {
    if cfg!(windows) { "system/tools/7za.exe" } else { "7z" }
}

fn default_tool(name: &str) -> &str {
    if cfg!(windows) {
        match name {
            "curl" => "system/tools/curl.exe",
            "wget" => "system/tools/wget.exe",
            other => other,
        }
    } else {
        name
    }
}
