//! Minimal INI reader for `build.ini`
//!
//! `[Section]` headers, `key=value` lines, `;` and `#` comments. Section and key
//! lookups are case-insensitive; the last assignment of a key wins. Keys that
//! appear before any header land in the unnamed section `""`.

use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Ini {
    sections: HashMap<String, HashMap<String, String>>,
}

impl Ini {
    /// Read and parse an INI file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse INI text. Malformed lines are ignored.
    pub fn parse(content: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current = String::new();

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = name.trim().to_lowercase();
                sections.entry(current.clone()).or_default();
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                sections
                    .entry(current.clone())
                    .or_default()
                    .insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }

        Self { sections }
    }

    /// Look up a value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_lowercase())
            .and_then(|s| s.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    /// Look up a value, falling back to `default` when absent.
    pub fn get_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get(section, key).unwrap_or(default).to_string()
    }

    /// Booleans are the literal string `1`; anything else is false.
    pub fn flag(&self, section: &str, key: &str) -> bool {
        self.get(section, key) == Some("1")
    }
}
