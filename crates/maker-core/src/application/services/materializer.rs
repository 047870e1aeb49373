//! Materializer - the main application orchestrator.
//!
//! One run walks a linear state machine:
//!
//! ```text
//! ValidateDestination -> ProbeTooling? -> WriteFiles -> InstallDeps?
//!     -> Audit? -> LaunchPreview? -> Done
//! ```
//!
//! A destination conflict, missing tooling and a failed install abort the
//! run. Everything after a successful install is advisory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem, PathState, ProgressEvent, ProgressReporter},
        services::{probe::ProbeChain, steps::Steps},
    },
    domain::{
        InstallOutcome, PackageManager, ProbeStrategyKind, ProjectDescriptor, RunSummary,
        RunWarning, TemplateSet, ToolingReport, Toolchain,
    },
    error::MakerResult,
};

/// Default pause before the dev server starts, so earlier output can settle.
pub const DEFAULT_PREVIEW_DELAY: Duration = Duration::from_secs(3);

/// Which optional phases to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Also disables the audit and the preview.
    pub skip_install: bool,
    pub skip_audit: bool,
    pub skip_dev_server: bool,
    pub preview_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            skip_install: false,
            skip_audit: false,
            skip_dev_server: false,
            preview_delay: DEFAULT_PREVIEW_DELAY,
        }
    }
}

/// Writes a new project and drives the package manager over it.
pub struct Materializer {
    templates: TemplateSet,
    toolchain: Toolchain,
    probe: ProbeChain,
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    reporter: Box<dyn ProgressReporter>,
}

impl Materializer {
    /// Create a materializer with the default toolchain and a direct-only probe.
    pub fn new(
        templates: TemplateSet,
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            templates,
            toolchain: Toolchain::default(),
            probe: ProbeChain::direct_only(),
            filesystem,
            runner,
            reporter,
        }
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_probe(mut self, probe: ProbeChain) -> Self {
        self.probe = probe;
        self
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Run every phase for `project`.
    ///
    /// Returns `Err` only for the fatal conditions: destination conflict,
    /// unavailable tooling, a failed install, or a write/spawn failure that
    /// leaves the scaffold incomplete.
    #[instrument(skip_all, fields(project = %project.name()))]
    pub fn materialize(
        &self,
        project: &ProjectDescriptor,
        options: &RunOptions,
    ) -> MakerResult<RunSummary> {
        let mut summary = RunSummary::new(project.clone());

        // 1. Validate destination
        self.validate_destination(project.root())?;

        // 2. Probe tooling
        let package_manager = if options.skip_install {
            None
        } else {
            let report = self.probe_tooling(&mut summary.warnings)?;
            let pm = self
                .toolchain
                .package_manager_at(&report.package_manager_program);
            summary.tooling = Some(report);
            Some(pm)
        };

        // 3. Write files
        summary.files_written = self.write_files(project)?;
        info!(files = summary.files_written.len(), "project files written");

        // 4. Install dependencies
        let Some(pm) = package_manager else {
            self.reporter.report(&ProgressEvent::InstallSkipped);
            self.report_ready(project, false, &self.toolchain.default_package_manager());
            return Ok(summary);
        };

        let steps = Steps {
            runner: self.runner.as_ref(),
            reporter: self.reporter.as_ref(),
            package_manager: &pm,
        };

        let install = steps.install(project.root());
        summary.install = Some(install);
        if install == InstallOutcome::Failed {
            return Err(ApplicationError::InstallFailed {
                project_name: project.name().to_string(),
                relaxed_flag: pm.relaxed_flag().to_owned(),
                manual_command: pm.manual_install_relaxed(),
            }
            .into());
        }

        // 5. Audit
        if !options.skip_audit {
            summary.audit = steps.audit(project.root(), &mut summary.warnings);
        }

        self.report_ready(project, true, &pm);

        // 6. Preview
        if !options.skip_dev_server {
            summary.preview = Some(steps.preview(
                project.root(),
                project.name().as_str(),
                options.preview_delay,
                &mut summary.warnings,
            ));
        }

        info!(warnings = summary.warnings.len(), "run complete");
        Ok(summary)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn validate_destination(&self, root: &Path) -> MakerResult<()> {
        match self.filesystem.inspect(root)? {
            PathState::Missing | PathState::EmptyDir => Ok(()),
            PathState::NonEmptyDir | PathState::NotADirectory => {
                warn!(path = %root.display(), "destination already exists");
                Err(ApplicationError::DestinationConflict {
                    path: root.to_path_buf(),
                }
                .into())
            }
        }
    }

    fn probe_tooling(&self, warnings: &mut Vec<RunWarning>) -> MakerResult<ToolingReport> {
        let report = self.probe.probe(
            &self.toolchain,
            self.runner.as_ref(),
            self.filesystem.as_ref(),
            self.reporter.as_ref(),
        )?;

        if report.strategy == ProbeStrategyKind::DependencyCache {
            let warning = RunWarning::ToolingAssumed {
                evidence: report.location.clone().unwrap_or_default(),
            };
            warn!(%warning, "non-fatal");
            self.reporter.report(&ProgressEvent::Warning(warning.clone()));
            warnings.push(warning);
        }

        self.reporter
            .report(&ProgressEvent::ToolingFound(report.clone()));
        Ok(report)
    }

    /// Create the tree and write every entry. Returns relative paths in
    /// write order, manifest first.
    fn write_files(&self, project: &ProjectDescriptor) -> MakerResult<Vec<PathBuf>> {
        let root = project.root();
        self.reporter.report(&ProgressEvent::Creating {
            name: project.name().clone(),
            root: root.to_path_buf(),
        });

        self.filesystem.create_dir_all(root)?;
        for dir in self.templates.directories() {
            self.filesystem.create_dir_all(&root.join(dir))?;
        }

        let manifest = self.templates.manifest();
        let rendered = manifest.render_for(project.name())?;
        let entries = std::iter::once((manifest.path(), rendered.as_str())).chain(
            self.templates
                .files()
                .iter()
                .map(|file| (file.path(), file.content())),
        );

        let mut written = Vec::with_capacity(self.templates.file_count());
        for (relative, content) in entries {
            self.filesystem.write_file(&root.join(relative), content)?;
            self.reporter.report(&ProgressEvent::FileWritten {
                path: relative.to_path_buf(),
            });
            written.push(relative.to_path_buf());
        }
        Ok(written)
    }

    fn report_ready(&self, project: &ProjectDescriptor, installed: bool, pm: &PackageManager) {
        let useful_commands = self
            .templates
            .manifest()
            .scripts()
            .into_iter()
            .map(|script| pm.manual_run(script))
            .collect();

        self.reporter.report(&ProgressEvent::ProjectReady {
            name: project.name().clone(),
            installed,
            manual_install: pm.manual_install(),
            manual_dev_server: pm.manual_dev_server(),
            useful_commands,
        });
    }
}
