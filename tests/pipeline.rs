//! End-to-end pipeline runs against an in-process fetcher.

mod common;

use common::{FakeFetcher, options, write_manifest};
use retrobuild::core::manifest::{
    EMULATORS_NAMES, FRONTEND_FILES, RETROBAT_TREE, SYSTEMS_NAMES, TEMPLATES, VERSION_PATCH,
};
use retrobuild::{Pipeline, Stage, StageReport};
use tempfile::TempDir;
use walkdir::WalkDir;

const SYSTEM_REPO: &str = "https://example/retrobat-setup";

/// The system component carries every manifest and template.
fn system_files() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "system/configgen/retrobat_tree.lst",
            "bios\n\n/roms\nsaves\\\nsystem/templates\nemulationstation/.emulationstation\n",
        ),
        ("system/configgen/emulators_names.lst", "mame\ndolphin\n"),
        ("system/configgen/systems_names.lst", "snes\nn64\n"),
        (
            "system/configgen/templates.lst",
            "system/templates/retrobat.ini|retrobat.ini\nbroken line\n|nothing\n",
        ),
        (
            "system/configgen/frontend_files.lst",
            "system/templates/es_settings.cfg|emulationstation/.emulationstation/es_settings.cfg\n",
        ),
        ("system/configgen/version_patch.lst", "retrobat.ini\n"),
        ("system/templates/retrobat.ini", "[RetroBat]\nVersion=@RETROBAT_VERSION@\n"),
        ("system/templates/es_settings.cfg", "<config/>"),
    ]
}

fn full_config() -> String {
    format!(
        "retrobat_version=7.0\nbranch=stable\narchitecture=win64\n\
         retrobat_ftp=http://mirror/\n\
         get_system=1\nretrobat_system_path={}\nget_emulators=1\n",
        SYSTEM_REPO
    )
}

fn fetcher() -> FakeFetcher {
    FakeFetcher::new()
        .with_source(SYSTEM_REPO, &system_files())
        .with_source("http://mirror/stable/emulators/mame.7z", &[("mame.exe", "MZ")])
        .with_source("http://mirror/stable/emulators/dolphin.7z", &[("Dolphin.exe", "MZ")])
}

fn report_for(reports: &[(Stage, StageReport)], stage: Stage) -> StageReport {
    reports
        .iter()
        .find(|(s, _)| *s == stage)
        .map(|(_, r)| *r)
        .unwrap_or_else(|| panic!("{stage} did not run"))
}

#[test]
fn test_full_build_lays_out_tree() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("build");
    let opts = options(&full_config());
    let fetcher = fetcher();

    let reports = Pipeline::new(&opts, &root, &fetcher).run(&[]).unwrap();

    // system clone lands at the root, without VCS metadata
    assert!(root.join("system/configgen/retrobat_tree.lst").is_file());
    assert!(!root.join(".git").exists());

    for dir in ["bios", "roms", "saves", "roms/snes", "saves/n64", "emulators/mame"] {
        assert!(root.join(dir).is_dir(), "{dir} missing");
    }
    assert_eq!(std::fs::read_to_string(root.join("emulators/dolphin/Dolphin.exe")).unwrap(), "MZ");

    assert_eq!(
        std::fs::read_to_string(root.join("emulationstation/.emulationstation/es_settings.cfg"))
            .unwrap(),
        "<config/>"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("retrobat.ini")).unwrap(),
        "[RetroBat]\nVersion=7.0-stable-win64\n"
    );
    for rel in retrobuild::engine::VERSION_FILES {
        assert_eq!(std::fs::read_to_string(root.join(rel)).unwrap(), "7.0-stable-win64");
    }

    assert_eq!(report_for(&reports, Stage::Acquire).done, 1);
    assert_eq!(report_for(&reports, Stage::Emulators).done, 2);
    assert_eq!(report_for(&reports, Stage::Templates).done, 1);
    // lrcores is not enabled
    assert!(reports.iter().all(|(s, _)| *s != Stage::Lrcores));
}

#[test]
fn test_tree_builder_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_manifest(root, RETROBAT_TREE, "bios\nroms\n  \nsaves\n");
    write_manifest(root, EMULATORS_NAMES, "mame\n");
    write_manifest(root, SYSTEMS_NAMES, "snes\n");

    let opts = options("");
    let fetcher = FakeFetcher::new();
    let pipeline = Pipeline::new(&opts, root, &fetcher);

    let first = pipeline.run(&[Stage::Tree, Stage::Folders]).unwrap();
    let snapshot: Vec<_> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap().path().to_path_buf())
        .collect();

    let second = pipeline.run(&[Stage::Tree, Stage::Folders]).unwrap();
    let after: Vec<_> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap().path().to_path_buf())
        .collect();

    assert_eq!(snapshot, after);
    assert_eq!(report_for(&first, Stage::Tree).done, 3);
    assert_eq!(report_for(&second, Stage::Tree).done, 0);
    assert_eq!(report_for(&second, Stage::Tree).skipped, 3);
    assert_eq!(report_for(&second, Stage::Folders).skipped, 3);
}

#[test]
fn test_missing_manifests_are_not_fatal() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("empty");
    let opts = options("get_lrcores=1\nget_emulators=1\n");
    let fetcher = FakeFetcher::new();

    let reports = Pipeline::new(&opts, &root, &fetcher)
        .run(&[
            Stage::Tree,
            Stage::Folders,
            Stage::Lrcores,
            Stage::Emulators,
            Stage::Frontend,
            Stage::Templates,
            Stage::VersionPatch,
        ])
        .unwrap();

    assert_eq!(reports.len(), 7);
    assert!(reports.iter().all(|(_, r)| r.total() == 0));
    assert!(fetcher.calls().is_empty());
    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn test_failed_component_does_not_cascade() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_manifest(root, EMULATORS_NAMES, "mame\nbroken\ndolphin\n");

    let opts = options(
        "retry_attempts=3\nretrobat_ftp=http://mirror/\nget_emulators=1\n\
         emulators_fallback_url=http://backup/{name}.7z\n",
    );
    let fetcher = FakeFetcher::new()
        .with_source("http://mirror/stable/emulators/mame.7z", &[("mame.exe", "")])
        .with_source("http://mirror/stable/emulators/dolphin.7z", &[("Dolphin.exe", "")]);

    let reports = Pipeline::new(&opts, root, &fetcher)
        .run(&[Stage::Emulators])
        .unwrap();

    assert_eq!(
        report_for(&reports, Stage::Emulators),
        StageReport {
            done: 2,
            skipped: 0,
            failed: 1
        }
    );
    assert_eq!(fetcher.calls_for("http://mirror/stable/emulators/broken.7z"), 3);
    assert_eq!(fetcher.calls_for("http://backup/broken.7z"), 1);
    assert!(root.join("emulators/dolphin/Dolphin.exe").is_file());
    // a failed download leaves no destination behind
    assert!(!root.join("emulators/broken").exists());
}

#[test]
fn test_fallback_supplies_component() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_manifest(root, "lrcores_names.lst", "snes9x\n");

    let opts = options(
        "retry_attempts=2\narchitecture=win64\nget_lrcores=1\n\
         retrobat_ftp=http://mirror/\nretroarch_url=http://bot\n",
    );
    let fetcher = FakeFetcher::new().with_source(
        "http://mirror/stable/lrcores/snes9x_libretro.dll.zip",
        &[("snes9x_libretro.dll", "core")],
    );

    let reports = Pipeline::new(&opts, root, &fetcher)
        .run(&[Stage::Lrcores])
        .unwrap();

    assert_eq!(report_for(&reports, Stage::Lrcores).done, 1);
    assert_eq!(
        fetcher.calls_for("http://bot/nightly/windows/x86_64/latest/snes9x_libretro.dll.zip"),
        2
    );
    assert!(root.join("emulators/retroarch/cores/snes9x_libretro.dll").is_file());
}

#[test]
fn test_bios_from_git_has_no_vcs_metadata() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("build");
    let opts = options("get_bios=1\nbios_git_url=https://example/repo\n");
    let fetcher = FakeFetcher::new().with_source(
        "https://example/repo",
        &[("psx/scph5501.bin", "bios"), ("readme.md", "# bios")],
    );

    let reports = Pipeline::new(&opts, &root, &fetcher)
        .run(&[Stage::Acquire])
        .unwrap();

    assert_eq!(report_for(&reports, Stage::Acquire).done, 1);
    assert!(root.join("bios/psx/scph5501.bin").is_file());
    assert!(
        WalkDir::new(root.join("bios"))
            .into_iter()
            .filter_map(Result::ok)
            .all(|e| e.file_name() != ".git")
    );
}

#[test]
fn test_acquire_wipes_previous_tree() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("build");
    std::fs::create_dir_all(root.join("leftover")).unwrap();
    std::fs::write(root.join("leftover/old.txt"), "old").unwrap();

    let opts = options("get_bios=1\nbios_git_url=https://example/repo\n");
    let fetcher = FakeFetcher::new().with_source("https://example/repo", &[("a.bin", "")]);
    Pipeline::new(&opts, &root, &fetcher)
        .run(&[Stage::Acquire])
        .unwrap();

    assert!(!root.join("leftover").exists());
    assert!(root.join("bios/a.bin").is_file());
}

#[test]
fn test_pair_manifest_robustness() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("a.cfg"), "a").unwrap();
    write_manifest(
        root,
        TEMPLATES,
        "\n\
         no separator\n\
         a.cfg|\n\
         |b.cfg\n\
         a.cfg|out/a.cfg|extra field\n\
         missing.cfg|out/missing.cfg\n",
    );
    write_manifest(root, FRONTEND_FILES, "");
    write_manifest(root, VERSION_PATCH, "");

    let opts = options("");
    let fetcher = FakeFetcher::new();
    let reports = Pipeline::new(&opts, root, &fetcher)
        .run(&[Stage::Frontend, Stage::Templates])
        .unwrap();

    assert_eq!(report_for(&reports, Stage::Frontend).total(), 0);
    assert_eq!(
        report_for(&reports, Stage::Templates),
        StageReport {
            done: 1,
            skipped: 0,
            failed: 1
        }
    );
    assert_eq!(std::fs::read_to_string(root.join("out/a.cfg")).unwrap(), "a");
    assert!(!root.join("out/missing.cfg").exists());
}
