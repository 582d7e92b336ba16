//! One-shot engine process invocation.
//!
//! An engine run is a bounded lifecycle: spawn, wait for termination, capture
//! both output channels and the exit status. There is no internal watchdog —
//! a hung engine hangs its own request and nothing else.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{error, info};

/// A command line for one engine invocation: program, arguments, optional
/// working directory.
#[derive(Debug, Clone)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
}

impl EngineCommand {
    /// Split a configured command line into program + leading arguments.
    pub fn from_parts(parts: &[String], workdir: Option<PathBuf>) -> Self {
        let mut iter = parts.iter();
        let program = iter.next().cloned().unwrap_or_default();
        Self {
            program,
            args: iter.cloned().collect(),
            workdir,
        }
    }
}

impl std::fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Everything observed from a terminated engine process.
///
/// Never partially populated: the process ran to completion before this
/// value was constructed.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessResult {
    /// Both captured channels joined — either may hold the actionable detail.
    pub fn combined_output(&self) -> String {
        format!("stdout: {}\nstderr: {}", self.stdout, self.stderr)
    }
}

/// The engine could not even be started (missing binary, permissions).
/// Distinct from a process that ran and failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to launch {program}: {source}")]
pub struct LaunchError {
    pub program: String,
    #[source]
    pub source: std::io::Error,
}

/// Run the command to completion, capturing stdout, stderr, exit status and
/// wall-clock elapsed time.
pub async fn invoke(cmd: &EngineCommand) -> Result<ProcessResult, LaunchError> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args).stdin(Stdio::null());
    if let Some(dir) = &cmd.workdir {
        command.current_dir(dir);
    }

    info!(command = %cmd, "invoking engine");
    let started = Instant::now();
    let output = command.output().await.map_err(|e| {
        error!(program = %cmd.program, "failed to launch engine: {e}");
        LaunchError {
            program: cmd.program.clone(),
            source: e,
        }
    })?;
    let elapsed = started.elapsed();

    let result = ProcessResult {
        exit_code: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        elapsed,
    };
    info!(
        program = %cmd.program,
        exit_code = ?result.exit_code,
        elapsed_ms = elapsed.as_millis() as u64,
        "engine exited"
    );
    Ok(result)
}
