//! Results of the individual run phases and the overall summary.

use std::fmt;
use std::path::PathBuf;

use crate::domain::project::ProjectDescriptor;

/// Which probe strategy established that the tooling is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStrategyKind {
    Direct,
    KnownLocations,
    DependencyCache,
    SecondaryShell,
}

impl ProbeStrategyKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct invocation",
            Self::KnownLocations => "known installation paths",
            Self::DependencyCache => "dependency cache heuristic",
            Self::SecondaryShell => "secondary shell",
        }
    }
}

impl fmt::Display for ProbeStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the tooling probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolingReport {
    pub strategy: ProbeStrategyKind,
    /// `None` when availability was assumed rather than observed.
    pub runtime_version: Option<String>,
    pub package_manager_version: Option<String>,
    /// Program to use for all later package-manager commands.
    pub package_manager_program: PathBuf,
    /// Installation directory, when found through a known location.
    pub location: Option<PathBuf>,
}

impl ToolingReport {
    pub fn is_assumed(&self) -> bool {
        self.runtime_version.is_none()
    }
}

/// Tri-state result of dependency installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    SucceededPlain,
    SucceededRelaxed,
    Failed,
}

impl InstallOutcome {
    pub fn succeeded(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The audit reported no findings.
    Clean,
    /// Findings were reported and the auto-fix succeeded.
    Fixed,
    /// Findings remain (auto-fix failed or could not run).
    Unfixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// The dev server exited on its own.
    Exited,
    /// The operator stopped it; a normal ending.
    Interrupted,
    LaunchFailed,
}

/// Non-fatal conditions. They are reported and never change the exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunWarning {
    /// Tooling availability was inferred from a dependency cache directory.
    ToolingAssumed { evidence: PathBuf },
    /// The audit command could not be run at all.
    AuditUnavailable { reason: String },
    /// The audit reported findings; an auto-fix will be attempted.
    AuditFindings,
    /// The auto-fix did not resolve every finding.
    AutoFixFailed { manual_command: String },
    /// The dev server could not be started or exited with an error.
    PreviewLaunchFailed {
        reason: String,
        manual_command: String,
    },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolingAssumed { evidence } => write!(
                f,
                "Tooling not found, but {} exists; assuming it is available",
                evidence.display()
            ),
            Self::AuditUnavailable { reason } => {
                write!(f, "Vulnerability audit could not run: {reason}")
            }
            Self::AuditFindings => f.write_str("Some vulnerabilities found. Attempting to fix..."),
            Self::AutoFixFailed { manual_command } => write!(
                f,
                "Some vulnerabilities couldn't be auto-fixed. Run '{manual_command}' later to review"
            ),
            Self::PreviewLaunchFailed {
                reason,
                manual_command,
            } => write!(
                f,
                "Failed to start dev server ({reason}). Start it manually: {manual_command}"
            ),
        }
    }
}

/// Everything a completed run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub project: ProjectDescriptor,
    pub files_written: Vec<PathBuf>,
    pub tooling: Option<ToolingReport>,
    pub install: Option<InstallOutcome>,
    pub audit: Option<AuditOutcome>,
    pub preview: Option<PreviewOutcome>,
    pub warnings: Vec<RunWarning>,
}

impl RunSummary {
    pub(crate) fn new(project: ProjectDescriptor) -> Self {
        Self {
            project,
            files_written: Vec::new(),
            tooling: None,
            install: None,
            audit: None,
            preview: None,
            warnings: Vec::new(),
        }
    }
}
