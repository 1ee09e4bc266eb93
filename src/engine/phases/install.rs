//! Frontend and template installation

use crate::core::StageReport;
use crate::core::manifest;
use crate::engine::Pipeline;
use crate::helpers::install::install_from_manifest;

/// Run the template installer over one manifest under `system/configgen`.
pub fn install_manifest(pipeline: &Pipeline<'_>, list: &str) -> StageReport {
    let root = pipeline.root();
    install_from_manifest(
        root,
        &manifest::manifest_path(root, list),
        pipeline.extractor(),
    )
}
