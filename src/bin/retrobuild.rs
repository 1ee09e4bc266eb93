//! retrobuild CLI - RetroBat distribution builder
//!
//! Usage:
//!   retrobuild build [--only <stage>]...   Download and configure the tree
//!   retrobuild archive                     Package the tree with a checksum
//!   retrobuild check                       Check external tools
//!   retrobuild options                     Print resolved build options
//!   retrobuild stages                      List stages and their state

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use retrobuild::core::tools;
use retrobuild::{BuildOptions, Pipeline, SourceFetcher, Stage, output, package};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "retrobuild")]
#[command(about = "Build and package a RetroBat distribution")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Build configuration file
    #[arg(short, long, global = true, default_value = "build.ini", env = "RETROBUILD_CONFIG")]
    config: PathBuf,

    /// Working tree (defaults to `build` next to the configuration file)
    #[arg(short, long, global = true)]
    build_dir: Option<PathBuf>,

    /// Where the archive is written (defaults to the configuration file's directory)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download components and lay out the working tree
    Build {
        /// Run only these stages (repeatable)
        #[arg(long = "only", value_name = "STAGE", value_parser = parse_stage)]
        only: Vec<Stage>,
    },

    /// Package the working tree as a ZIP with a SHA-256 sidecar
    Archive,

    /// Check that the required external tools are available
    Check,

    /// Print every resolved build option
    Options,

    /// List stages and whether they are enabled
    Stages,
}

fn parse_stage(name: &str) -> Result<Stage, String> {
    Stage::from_name(name).ok_or_else(|| {
        let known: Vec<_> = Stage::ALL.iter().map(Stage::name).collect();
        format!("unknown stage '{}' (expected one of: {})", name, known.join(", "))
    })
}

fn base_dir(config: &Path) -> PathBuf {
    config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() {
    let cli = Cli::parse();

    let log_path = base_dir(&cli.config).join("build.log");
    if let Err(e) = output::init_log_file(&log_path) {
        output::warning(&format!("cannot open {}: {}", log_path.display(), e));
    }
    let args: Vec<String> = std::env::args().collect();
    output::start(&args.join(" "));

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            output::error(&format!("{:#}", e));
            1
        }
    };

    output::exit(code);
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let options = BuildOptions::load(&cli.config)?;
    let base = base_dir(&cli.config);
    let build_dir = cli.build_dir.unwrap_or_else(|| base.join("build"));

    match cli.command {
        Commands::Build { only } => {
            let report = tools::run_preflight(&options);
            if !report.all_passed() {
                report.print();
                report.into_result()?;
            }

            let fetcher = SourceFetcher::from_options(&options);
            let reports = Pipeline::new(&options, &build_dir, &fetcher).run(&only)?;

            let failed: usize = reports.iter().map(|(_, r)| r.failed).sum();
            if failed > 0 {
                output::warning(&format!("build finished with {} failed item(s)", failed));
            } else {
                output::success(&format!("build finished in {}", build_dir.display()));
            }
        }

        Commands::Archive => {
            if options.retrobat_version.is_empty() {
                bail!("retrobat_version is not set in {}", cli.config.display());
            }
            let output_dir = cli.output_dir.unwrap_or(base);
            let archive = output_dir.join(retrobuild::engine::archive_name(&options));
            package(&build_dir, &archive)
                .with_context(|| format!("cannot package {}", build_dir.display()))?;
        }

        Commands::Check => {
            let report = tools::run_preflight(&options);
            report.print();
            report.into_result()?;
            output::success("all required tools found");
        }

        Commands::Options => {
            for (name, value) in options.entries() {
                output::info(&format!("{} = {}", name, value));
            }
        }

        Commands::Stages => {
            for stage in Stage::ALL {
                let state = if stage.enabled(&options) {
                    format!("{:<9}", "enabled").green().to_string()
                } else {
                    format!("{:<9}", "disabled").dimmed().to_string()
                };
                println!("{:<14} {} {}", stage.name(), state, stage.label());
            }
        }
    }

    Ok(())
}
