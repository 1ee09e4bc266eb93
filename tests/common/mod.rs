//! Shared helpers for integration tests.

#![allow(dead_code)]

use anyhow::bail;
use retrobuild::core::ini::Ini;
use retrobuild::core::manifest;
use retrobuild::helpers::acquire::git::copy_checkout;
use retrobuild::{Backend, BuildOptions, Fetch, FetchTask};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// In-process fetcher serving canned file sets keyed by locator.
///
/// Archive-backed tasks write their files straight into the destination.
/// Git-backed tasks are materialized as a scratch checkout with a `.git`
/// directory and copied with the same routine the real git backend uses.
/// Unknown locators fail.
#[derive(Default)]
pub struct FakeFetcher {
    sources: HashMap<String, Vec<(String, String)>>,
    calls: RefCell<Vec<FetchTask>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, locator: &str, files: &[(&str, &str)]) -> Self {
        self.sources.insert(
            locator.to_string(),
            files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<FetchTask> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, locator: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|t| t.locator == locator)
            .count()
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&self, task: &FetchTask) -> anyhow::Result<()> {
        self.calls.borrow_mut().push(task.clone());
        let Some(files) = self.sources.get(&task.locator) else {
            bail!("HTTP 404 for {}", task.locator);
        };

        if task.backend == Backend::Git {
            let scratch = tempfile::tempdir()?;
            let checkout = scratch.path().join("repo");
            std::fs::create_dir_all(checkout.join(".git/refs"))?;
            std::fs::write(checkout.join(".git/HEAD"), "ref: refs/heads/master")?;
            write_files(&checkout, files);
            copy_checkout(&checkout, &task.dest)?;
        } else {
            write_files(&task.dest, files);
        }
        Ok(())
    }
}

fn write_files(root: &Path, files: &[(String, String)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

/// Options parsed from a `[BuilderOptions]` body, with zero retry delay.
pub fn options(body: &str) -> BuildOptions {
    let ini = format!("[BuilderOptions]\nretry_delay_secs=0\n{}", body);
    BuildOptions::from_ini(&Ini::parse(&ini), Path::new(".")).unwrap()
}

/// Write a manifest under `<root>/system/configgen`.
pub fn write_manifest(root: &Path, name: &str, content: &str) {
    let path = manifest::manifest_path(root, name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
