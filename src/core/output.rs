//! Colored console output and the build log
//!
//! Console lines use owo-colors the same way for every stage. When a log file
//! has been installed with [`init_log_file`], every message is also appended,
//! uncolored, as `YYYY-MM-DD HH:MM:SS.mmm [LEVEL] message`.

use owo_colors::OwoColorize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Process-wide log sink, installed once by the binary.
static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

/// Severity prefix written to the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Start,
    Label,
    Info,
    Warning,
    Error,
    Exit,
}

impl Level {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Start => "[START]",
            Self::Label => "[LABEL]",
            Self::Info => "[INFO]",
            Self::Warning => "[WARNING]",
            Self::Error => "[ERROR]",
            Self::Exit => "[EXIT]",
        }
    }
}

/// Truncate (or create) the log file and route every later message into it.
///
/// Calling this twice keeps the first sink.
pub fn init_log_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let _ = LOG_FILE.set(Mutex::new(file));
    Ok(())
}

/// Format one log-file line.
pub fn format_line(level: Level, message: &str) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("{} {} {}", now, level.tag(), message)
}

fn record(level: Level, message: &str) {
    let Some(sink) = LOG_FILE.get() else {
        return;
    };
    if let Ok(mut file) = sink.lock() {
        // A broken log file must never take the build down with it.
        let _ = writeln!(file, "{}", format_line(level, message));
    }
}

/// Log the start of a run.
pub fn start(program: &str) {
    record(Level::Start, &format!("Run: {}", program));
}

/// Log the final exit code of a run.
pub fn exit(code: i32) {
    record(Level::Exit, &code.to_string());
}

/// Print a stage header (blue, bold)
/// Example: "==> [tree] Creating RetroBat tree"
pub fn label(stage: &str, message: &str) {
    println!(
        "{} {} {}",
        "==>".blue().bold(),
        format!("[{}]", stage).cyan(),
        message.bold()
    );
    record(Level::Label, &format!(":{} {}", stage, message));
}

/// Print an action header (blue, bold)
pub fn action(message: &str) {
    println!("{} {}", "==>".blue().bold(), message.bold());
    record(Level::Info, message);
}

/// Print a detail line (dimmed prefix)
/// Example: "     downloading https://..."
pub fn detail(message: &str) {
    println!("     {}", message.dimmed());
    record(Level::Info, message);
}

/// Print a success message (green)
pub fn success(message: &str) {
    println!("{} {}", "==>".green().bold(), message.green());
    record(Level::Info, message);
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    println!("{} {}", "::".cyan(), message);
    record(Level::Info, message);
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
    record(Level::Warning, message);
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
    record(Level::Error, message);
}

/// Print a skip message (dimmed)
/// Example: "==> emulators/mame already exists, skipping"
pub fn skip(message: &str) {
    println!("{} {}", "==>".dimmed(), message.dimmed());
    record(Level::Info, message);
}
