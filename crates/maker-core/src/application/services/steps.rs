//! Package-manager steps: install, audit, and the dev-server preview.
//!
//! Each step decides how its own failures are treated. Only a failed
//! install (after the single relaxed retry) is fatal; audit and preview
//! problems become [`RunWarning`]s.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{CommandRunner, ProgressEvent, ProgressReporter},
    domain::{
        AuditOutcome, CommandOutcome, CommandOutput, CommandSpec, InstallOutcome,
        PackageManager, PreviewOutcome, RunWarning, StdioMode,
    },
};

/// Runs package-manager commands and reports them to the operator.
pub(crate) struct Steps<'a> {
    pub runner: &'a dyn CommandRunner,
    pub reporter: &'a dyn ProgressReporter,
    pub package_manager: &'a PackageManager,
}

impl Steps<'_> {
    /// Install, retrying once with relaxed dependency resolution.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn install(&self, root: &Path) -> InstallOutcome {
        self.reporter.report(&ProgressEvent::InstallStarted);

        if self.captured_succeeds(self.package_manager.install(root)) {
            info!("install succeeded");
            return InstallOutcome::SucceededPlain;
        }

        let flag = self.package_manager.relaxed_flag().to_owned();
        warn!(%flag, "install failed, retrying with relaxed resolution");
        self.reporter.report(&ProgressEvent::RetryingRelaxed { flag });

        if self.captured_succeeds(self.package_manager.install_relaxed(root)) {
            info!("relaxed install succeeded");
            InstallOutcome::SucceededRelaxed
        } else {
            warn!("relaxed install failed");
            InstallOutcome::Failed
        }
    }

    /// Audit, and run the auto-fix once when findings are reported.
    ///
    /// Returns `None` when the audit itself could not be started.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn audit(&self, root: &Path, warnings: &mut Vec<RunWarning>) -> Option<AuditOutcome> {
        self.reporter.report(&ProgressEvent::AuditStarted);

        let audit = match self.captured(self.package_manager.audit(root)) {
            Ok(out) => out,
            Err(reason) => {
                self.warn(warnings, RunWarning::AuditUnavailable { reason });
                return None;
            }
        };

        if audit.success() {
            self.reporter.report(&ProgressEvent::AuditClean);
            return Some(AuditOutcome::Clean);
        }

        self.warn(warnings, RunWarning::AuditFindings);

        match self.captured(self.package_manager.audit_fix(root)) {
            Ok(fix) if fix.success() => {
                self.reporter.report(&ProgressEvent::AuditFixed);
                Some(AuditOutcome::Fixed)
            }
            _ => {
                self.warn(
                    warnings,
                    RunWarning::AutoFixFailed {
                        manual_command: self.package_manager.manual_audit(),
                    },
                );
                Some(AuditOutcome::Unfixed)
            }
        }
    }

    /// Wait `delay`, then run the dev server attached to the terminal.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn preview(
        &self,
        root: &Path,
        project_name: &str,
        delay: Duration,
        warnings: &mut Vec<RunWarning>,
    ) -> PreviewOutcome {
        self.reporter.report(&ProgressEvent::PreviewCountdown { delay });
        self.runner.pause(delay);

        let spec = self.package_manager.dev_server(root);
        let manual_command = format!(
            "cd {project_name} && {}",
            self.package_manager.manual_dev_server()
        );
        self.reporter.report(&ProgressEvent::CommandStarted {
            command: spec.to_string(),
        });

        let failure = match self.runner.run(&spec, StdioMode::Attached) {
            Ok(CommandOutcome::Interrupted) => {
                info!("dev server stopped by operator");
                self.reporter
                    .report(&ProgressEvent::PreviewStopped { interrupted: true });
                return PreviewOutcome::Interrupted;
            }
            Ok(CommandOutcome::Completed(out)) if out.success() => {
                self.reporter
                    .report(&ProgressEvent::PreviewStopped { interrupted: false });
                return PreviewOutcome::Exited;
            }
            Ok(CommandOutcome::Completed(out)) => describe_exit(&out),
            Err(e) => e.to_string(),
        };

        self.warn(
            warnings,
            RunWarning::PreviewLaunchFailed {
                reason: failure,
                manual_command,
            },
        );
        PreviewOutcome::LaunchFailed
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn captured_succeeds(&self, spec: CommandSpec) -> bool {
        matches!(self.captured(spec), Ok(out) if out.success())
    }

    /// Run with captured output, echoing the command and its output.
    ///
    /// `Err` carries the reason the command could not be started.
    fn captured(&self, spec: CommandSpec) -> Result<CommandOutput, String> {
        let command = spec.to_string();
        self.reporter.report(&ProgressEvent::CommandStarted {
            command: command.clone(),
        });
        debug!(%command, "running");

        let output = match self.runner.run(&spec, StdioMode::Captured) {
            Ok(CommandOutcome::Completed(out)) => out,
            // Captured commands are not interruptible; treat like a kill.
            Ok(CommandOutcome::Interrupted) => CommandOutput::default(),
            Err(e) => {
                let reason = e.to_string();
                warn!(%command, %reason, "command could not start");
                self.reporter.report(&ProgressEvent::CommandFinished {
                    command,
                    output: CommandOutput {
                        code: None,
                        stdout: String::new(),
                        stderr: reason.clone(),
                    },
                });
                return Err(reason);
            }
        };

        debug!(%command, code = ?output.code, "finished");
        self.reporter.report(&ProgressEvent::CommandFinished {
            command,
            output: output.clone(),
        });
        Ok(output)
    }

    fn warn(&self, warnings: &mut Vec<RunWarning>, warning: RunWarning) {
        warn!(%warning, "non-fatal");
        self.reporter.report(&ProgressEvent::Warning(warning.clone()));
        warnings.push(warning);
    }
}

fn describe_exit(out: &CommandOutput) -> String {
    match out.code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".into(),
    }
}
