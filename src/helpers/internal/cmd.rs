//! External tool execution
//!
//! Builder for running the archiver, `curl`, `wget` and `git` with captured
//! output. Arguments are passed directly, never through a shell, and the exit
//! code is the only success signal.

use anyhow::{Result, bail};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Builder for an external tool invocation.
///
/// # Example
/// ```ignore
/// ToolCmd::new("7z")
///     .args(["x", "mame.7z", "-oemulators/mame", "-y"])
///     .run()?;
/// ```
#[derive(Clone, Debug)]
pub struct ToolCmd {
    program: PathBuf,
    args: Vec<OsString>,
}

/// Output from a command execution.
#[derive(Debug, Clone)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

impl ToolCmd {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Run the command and capture both stdout and stderr.
    ///
    /// Fails only when the program cannot be started.
    pub fn output_all(&self) -> Result<CmdOutput> {
        let output = match self.build_command().output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!("executable not found: {}", self.program.display())
            }
            Err(e) => bail!("{} failed to start: {}", self.program.display(), e),
        };

        Ok(CmdOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
            success: output.status.success(),
        })
    }

    /// Run the command, failing on a non-zero exit with its stderr attached.
    pub fn run(&self) -> Result<CmdOutput> {
        let out = self.output_all()?;
        if !out.success {
            let diagnostic = match out.stderr.trim() {
                "" => out.stdout.trim(),
                stderr => stderr,
            };
            bail!(
                "command failed with exit code {}\n  command: {}\n  {}",
                out.exit_code,
                self.display_cmd(),
                diagnostic
            );
        }
        Ok(out)
    }

    /// Program and arguments, truncated for display.
    pub fn display_cmd(&self) -> String {
        let mut full = self.program.display().to_string();
        for arg in &self.args {
            full.push(' ');
            full.push_str(&arg.to_string_lossy());
        }
        if full.chars().count() > 120 {
            let short: String = full.chars().take(117).collect();
            format!("{}...", short)
        } else {
            full
        }
    }
}
