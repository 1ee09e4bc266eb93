//! Component acquisition
//!
//! Each enabled component becomes one primary [`FetchTask`] plus an optional
//! fallback task, handed to the retry coordinator. A component that cannot be
//! fetched is logged and counted; the next component still runs.

use crate::core::component::{Component, SourceKind};
use crate::core::manifest;
use crate::core::output;
use crate::core::{BuildOptions, StageReport};
use crate::engine::Pipeline;
use crate::helpers::acquire::{Backend, FetchTask, Outcome, acquire};
use crate::helpers::internal::fs_utils::normalize_separators;
use std::path::{Path, PathBuf};

/// Fetch every enabled single-source component, in declaration order.
pub fn acquire_packages(pipeline: &Pipeline<'_>) -> StageReport {
    let mut report = StageReport::default();
    for component in Component::PACKAGES {
        if !pipeline.options().is_enabled(component) {
            continue;
        }
        record(&mut report, acquire_component(pipeline, component, None));
    }
    report
}

/// Fetch a name-templated component once per line of its manifest.
pub fn acquire_named(pipeline: &Pipeline<'_>, component: Component, list: &str) -> StageReport {
    let list_path = manifest::manifest_path(pipeline.root(), list);
    let Some(names) = manifest::read_names(&list_path) else {
        output::info(&format!(
            "manifest {} not found, nothing to download",
            list_path.display()
        ));
        return StageReport::default();
    };

    let mut report = StageReport::default();
    for name in names {
        record(&mut report, acquire_component(pipeline, component, Some(&name)));
    }
    report
}

fn record(report: &mut StageReport, outcome: Outcome) {
    if outcome.is_success() {
        report.done += 1;
    } else {
        report.failed += 1;
    }
}

/// Build the primary and fallback tasks for one component.
pub fn tasks_for(
    options: &BuildOptions,
    root: &Path,
    component: Component,
    name: Option<&str>,
) -> (FetchTask, Option<FetchTask>) {
    let source = options.source(component);
    let dest = destination(root, &options.render(component.destination(), name));
    let backend = match component.kind() {
        SourceKind::Git => Backend::Git,
        SourceKind::Archive => options.download_backend,
    };

    let primary = FetchTask::new(options.render(&source.primary, name), &dest, backend);
    let fallback = source
        .fallback
        .map(|template| FetchTask::new(options.render(&template, name), &dest, backend));
    (primary, fallback)
}

fn destination(root: &Path, rendered: &str) -> PathBuf {
    let rel = normalize_separators(rendered);
    if rel.is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

fn acquire_component(pipeline: &Pipeline<'_>, component: Component, name: Option<&str>) -> Outcome {
    let display = match name {
        Some(name) => format!("{} ({})", component, name),
        None => component.to_string(),
    };
    let (primary, fallback) = tasks_for(pipeline.options(), pipeline.root(), component, name);

    output::action(&format!("{} -> {}", display, primary.dest.display()));
    let outcome = acquire(pipeline.fetcher(), &primary, fallback.as_ref(), pipeline.policy());

    match &outcome {
        Outcome::Primary { attempts: 1 } => output::success(&format!("{} acquired", display)),
        Outcome::Primary { attempts } => output::success(&format!(
            "{} acquired after {} attempts",
            display, attempts
        )),
        Outcome::Fallback => output::success(&format!("{} acquired from fallback", display)),
        Outcome::Failed { reason } => {
            output::error(&format!("{} skipped: {}", display, reason))
        }
    }
    outcome
}
