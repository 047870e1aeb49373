//! Implementation of project creation, the tool's only command.
//!
//! Responsibility: translate CLI arguments and configuration into a
//! `ProjectDescriptor` plus `RunOptions`, wire the adapters into a
//! `Materializer`, and run it. No business logic lives here.

use std::path::Path;

use tracing::{debug, info, instrument};

use maker_adapters::{
    InterruptFlag, LocalFilesystem, ProbeSettings, SystemRunner, probe_chain, r3f_template_set,
};
use maker_core::{
    application::{Materializer, RunOptions},
    domain::{ProjectDescriptor, ProjectName, RunSummary},
    error::MakerError,
};

use crate::{
    cli::NewArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Create the project named in `args` under the current directory.
///
/// Dispatch sequence:
/// 1. Validate the project name (before touching the filesystem)
/// 2. Resolve the destination against the current directory
/// 3. Build the probe chain from configuration and flags
/// 4. Run the materializer with the local filesystem and system runner
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    config: AppConfig,
    output: OutputManager,
    interrupt: InterruptFlag,
) -> CliResult<RunSummary> {
    // 1. Validate name
    let name = ProjectName::new(args.name.as_str()).map_err(MakerError::from)?;

    // 2. Resolve destination
    let cwd = std::env::current_dir().map_err(|e| CliError::IoError {
        message: "Failed to read the current directory".into(),
        source: e,
    })?;
    let project = ProjectDescriptor::in_dir(name, &cwd);
    debug!(root = %project.root().display(), "destination resolved");

    // 3. Probe chain and options
    let options = run_options(&args, &config);
    let materializer = build_materializer(&args, &config, output, interrupt, &cwd)?;

    // 4. Run
    let summary = materializer.materialize(&project, &options)?;

    info!(
        files = summary.files_written.len(),
        install = ?summary.install,
        audit = ?summary.audit,
        preview = ?summary.preview,
        warnings = summary.warnings.len(),
        "project created"
    );
    Ok(summary)
}

fn run_options(args: &NewArgs, config: &AppConfig) -> RunOptions {
    RunOptions {
        skip_install: args.skip_install,
        skip_audit: args.skip_audit,
        skip_dev_server: args.skip_dev_server,
        preview_delay: config.preview_delay(),
    }
}

fn probe_settings(args: &NewArgs, config: &AppConfig, cwd: &Path) -> ProbeSettings {
    ProbeSettings {
        trust_dependency_cache: args.trust_dependency_cache
            || config.probe.trust_dependency_cache,
        search_paths: config.search_paths(cwd),
    }
}

fn build_materializer(
    args: &NewArgs,
    config: &AppConfig,
    output: OutputManager,
    interrupt: InterruptFlag,
    cwd: &Path,
) -> CliResult<Materializer> {
    let templates = r3f_template_set().map_err(MakerError::from)?;
    let probe = probe_chain(&probe_settings(args, config, cwd), cwd);

    Ok(Materializer::new(
        templates,
        Box::new(LocalFilesystem::new()),
        Box::new(SystemRunner::new(interrupt)),
        Box::new(output),
    )
    .with_toolchain(config.toolchain())
    .with_probe(probe))
}
