//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `maker-adapters` crate provides implementations, and the CLI provides
//! the terminal-facing [`ProgressReporter`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{
    CommandOutcome, CommandOutput, CommandSpec, ProbeStrategyKind, ProjectName, RunWarning,
    StdioMode, ToolingReport,
};
use crate::error::MakerResult;

/// What is at a destination path before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Missing,
    EmptyDir,
    NonEmptyDir,
    /// A file, symlink to a file, or anything else that is not a directory.
    NotADirectory,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `maker_adapters::filesystem::LocalFilesystem` (production)
/// - `maker_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Classify a destination path.
    fn inspect(&self, path: &Path) -> MakerResult<PathState>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> MakerResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> MakerResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for running external programs.
///
/// Implemented by:
/// - `maker_adapters::process::SystemRunner` (production)
/// - `maker_adapters::process::ScriptedRunner` (testing)
///
/// A program that cannot be started at all is an `Err`; a program that ran
/// and failed is `Ok(CommandOutcome::Completed(..))` with a non-zero code.
/// Callers decide whether a failure is fatal.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, spec: &CommandSpec, mode: StdioMode) -> MakerResult<CommandOutcome>;

    /// Block for `delay` before the next step. Test runners return at once.
    fn pause(&self, delay: Duration);
}

/// Progress notifications for the human operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Creating { name: ProjectName, root: PathBuf },
    FileWritten { path: PathBuf },
    ProbeAttempt { strategy: ProbeStrategyKind },
    LocationFound { path: PathBuf },
    ToolingFound(ToolingReport),
    CommandStarted { command: String },
    CommandFinished { command: String, output: CommandOutput },
    InstallStarted,
    RetryingRelaxed { flag: String },
    InstallSkipped,
    AuditStarted,
    AuditClean,
    AuditFixed,
    Warning(RunWarning),
    ProjectReady {
        name: ProjectName,
        installed: bool,
        manual_install: String,
        manual_dev_server: String,
        useful_commands: Vec<String>,
    },
    PreviewCountdown { delay: Duration },
    PreviewStopped { interrupted: bool },
}

/// Port for operator-facing progress output.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}
