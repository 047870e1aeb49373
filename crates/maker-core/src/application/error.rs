//! Application layer errors.
//!
//! These errors represent failures of the materialization workflow, not of
//! domain rules. Domain errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while materializing a project.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Destination exists and is not an empty directory.
    #[error("Destination {path} already exists and is not empty")]
    DestinationConflict { path: PathBuf },

    /// No probe strategy found a usable runtime and package manager.
    #[error("{runtime} and/or {package_manager} not found in PATH or common locations")]
    ToolingUnavailable {
        runtime: String,
        package_manager: String,
        searched: Vec<PathBuf>,
    },

    /// Install failed, including the single relaxed-resolution retry.
    #[error("Dependency installation failed even with {relaxed_flag}")]
    InstallFailed {
        project_name: String,
        relaxed_flag: String,
        manual_command: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A child process could not be started at all.
    #[error("Failed to start '{command}': {reason}")]
    CommandSpawn { command: String, reason: String },

    /// In-memory adapter lock poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DestinationConflict { path } => vec![
                format!("The directory '{}' already has content", path.display()),
                "Use a different name or remove the existing directory".into(),
                "Nothing was written".into(),
            ],
            Self::ToolingUnavailable {
                runtime,
                package_manager,
                searched,
            } => {
                let mut n = 0;
                let mut step = |text: String| {
                    n += 1;
                    format!("{n}. {text}")
                };

                let mut lines = vec![
                    step(format!("Open a terminal and try: {runtime} --version")),
                    step("If that works, the tool may be seeing a different PATH".into()),
                    step(format!("Add the {runtime} installation to your PATH")),
                ];
                if !searched.is_empty() {
                    lines.push(step("Locations searched:".into()));
                    lines.extend(searched.iter().map(|p| format!("     - {}", p.display())));
                }
                lines.push(step("Restart your terminal after PATH changes".into()));
                lines.push(format!(
                    "Or pass --skip-install to create the project without {package_manager}"
                ));
                lines
            }
            Self::InstallFailed {
                project_name,
                manual_command,
                ..
            } => vec![
                "You can try installing manually:".into(),
                format!("  cd {project_name}"),
                format!("  {manual_command}"),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
                "Files written so far were left in place for inspection".into(),
            ],
            Self::CommandSpawn { command, .. } => vec![
                format!("Could not run: {command}"),
                "Ensure the command is installed and in your PATH".into(),
            ],
            Self::LockPoisoned => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DestinationConflict { .. } => ErrorCategory::Validation,
            Self::ToolingUnavailable { .. } => ErrorCategory::Environment,
            Self::InstallFailed { .. } | Self::CommandSpawn { .. } => ErrorCategory::External,
            Self::FilesystemError { .. } | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_failed_suggests_exact_recovery() {
        let err = ApplicationError::InstallFailed {
            project_name: "demo".into(),
            relaxed_flag: "--legacy-peer-deps".into(),
            manual_command: "npm install --legacy-peer-deps".into(),
        };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.trim() == "cd demo"));
        assert!(
            suggestions
                .iter()
                .any(|s| s.trim() == "npm install --legacy-peer-deps")
        );
    }

    #[test]
    fn tooling_unavailable_lists_paths_and_skip_flag() {
        let err = ApplicationError::ToolingUnavailable {
            runtime: "node".into(),
            package_manager: "npm".into(),
            searched: vec![PathBuf::from("/usr/local/bin")],
        };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("/usr/local/bin")));
        assert!(suggestions.iter().any(|s| s.contains("--skip-install")));
        assert_eq!(err.category(), ErrorCategory::Environment);
    }

    #[test]
    fn tooling_steps_are_numbered_consecutively() {
        let numbered = |searched: Vec<PathBuf>| -> Vec<String> {
            ApplicationError::ToolingUnavailable {
                runtime: "node".into(),
                package_manager: "npm".into(),
                searched,
            }
            .suggestions()
            .into_iter()
            .filter_map(|s| s.split_once(". ").map(|(n, _)| n.to_owned()))
            .filter(|n| n.chars().all(|c| c.is_ascii_digit()))
            .collect()
        };

        assert_eq!(numbered(Vec::new()), ["1", "2", "3", "4"]);
        assert_eq!(
            numbered(vec![PathBuf::from("/usr/local/bin")]),
            ["1", "2", "3", "4", "5"]
        );
    }

    #[test]
    fn conflict_is_validation() {
        let err = ApplicationError::DestinationConflict {
            path: PathBuf::from("/work/demo"),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().contains("/work/demo"));
    }
}
