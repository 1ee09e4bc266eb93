//! URL parsing and validation utilities
//!
//! Filenames for downloaded archives and scheme checks for git remotes.

use anyhow::{Result, bail};

/// Allowed URL schemes for different operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlScheme {
    Http,
    Https,
    Ssh,
    Git,
    GitDaemon,
    File,
}

impl UrlScheme {
    /// Get the scheme prefix string
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Http => "http://",
            Self::Https => "https://",
            Self::Ssh => "ssh://",
            Self::Git => "git@",
            Self::GitDaemon => "git://",
            Self::File => "file://",
        }
    }
}

/// Schemes accepted for git clones.
pub const GIT_SCHEMES: &[UrlScheme] = &[
    UrlScheme::Https,
    UrlScheme::Http,
    UrlScheme::Ssh,
    UrlScheme::Git,
    UrlScheme::GitDaemon,
    UrlScheme::File,
];

/// Validate that a URL uses one of the allowed schemes.
pub fn validate_url_scheme(url: &str, allowed: &[UrlScheme]) -> Result<()> {
    let url_lower = url.to_lowercase();

    if allowed.iter().any(|s| url_lower.starts_with(s.prefix())) {
        return Ok(());
    }

    let allowed_str: Vec<_> = allowed.iter().map(|s| s.prefix()).collect();
    bail!("URL must use one of: {:?}\n  got: {}", allowed_str, url)
}

/// Extract filename from a URL.
///
/// Handles query strings and fragments, returns "download" as fallback.
///
/// # Example
/// ```ignore
/// assert_eq!(extract_filename("http://www.retrobat.ovh/repo/stable/emulators/mame.7z"), "mame.7z");
/// assert_eq!(extract_filename("https://example.com/file.zip?v=1"), "file.zip");
/// ```
pub fn extract_filename(url: &str) -> String {
    let clean_url = url.split('?').next().unwrap_or(url);
    let clean_url = clean_url.split('#').next().unwrap_or(clean_url);

    // A bare authority ("https://host") has no path segment to name the file.
    let path = clean_url
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or(""))
        .unwrap_or(clean_url);

    path.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(sanitize_filename)
        .unwrap_or_else(|| "download".to_string())
}

/// Sanitize a filename for safe filesystem use.
///
/// Replaces problematic characters and handles special names.
pub fn sanitize_filename(name: &str) -> String {
    if name.is_empty() || name == "." || name == ".." {
        return "download".to_string();
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim().trim_matches('.');

    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extract repository name from a git URL.
///
/// # Example
/// ```ignore
/// assert_eq!(extract_repo_name("https://github.com/foo/bar.git"), "bar");
/// assert_eq!(extract_repo_name("git@github.com:foo/bar.git"), "bar");
/// ```
pub fn extract_repo_name(url: &str) -> String {
    let clean = url.split('#').next().unwrap_or(url);
    let clean = clean.split('?').next().unwrap_or(clean);
    let clean = clean.trim_end_matches('/').trim_end_matches(".git");

    // git@host:user/repo
    if let Some(colon_pos) = clean.rfind(':')
        && !clean[..colon_pos].contains('/')
    {
        let after_colon = &clean[colon_pos + 1..];
        return after_colon.rsplit('/').next().unwrap_or("repo").to_string();
    }

    clean
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("repo")
        .to_string()
}
