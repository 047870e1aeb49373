//! Integration tests: the materializer over in-memory adapters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use maker_adapters::{
    MemoryFilesystem, ProbeSettings, RecordingReporter, Reply, ScriptedRunner, probe_chain,
    r3f_template_set,
};
use maker_core::{
    application::ProbeStrategy,
    domain::{AuditOutcome, InstallOutcome, PreviewOutcome, ProbeStrategyKind, StdioMode},
    prelude::*,
};

const WORK: &str = "/work";

struct Harness {
    fs: MemoryFilesystem,
    runner: ScriptedRunner,
    reporter: RecordingReporter,
    probe: ProbeChain,
}

impl Harness {
    fn new(runner: ScriptedRunner) -> Self {
        Self {
            fs: MemoryFilesystem::new(),
            runner,
            reporter: RecordingReporter::new(),
            probe: ProbeChain::direct_only(),
        }
    }

    fn with_fs(mut self, fs: MemoryFilesystem) -> Self {
        self.fs = fs;
        self
    }

    fn with_probe(mut self, probe: ProbeChain) -> Self {
        self.probe = probe;
        self
    }

    fn run(&self, name: &str, options: RunOptions) -> MakerResult<RunSummary> {
        let materializer = Materializer::new(
            r3f_template_set().unwrap(),
            Box::new(self.fs.clone()),
            Box::new(self.runner.clone()),
            Box::new(self.reporter.clone()),
        )
        .with_probe(self.probe.clone());

        let project = ProjectDescriptor::in_dir(ProjectName::new(name).unwrap(), WORK);
        materializer.materialize(&project, &options)
    }
}

fn root() -> PathBuf {
    Path::new(WORK).join("demo")
}

fn no_delay() -> RunOptions {
    RunOptions {
        preview_delay: Duration::ZERO,
        ..RunOptions::default()
    }
}

fn skip_install() -> RunOptions {
    RunOptions {
        skip_install: true,
        ..RunOptions::default()
    }
}

#[test]
fn skip_install_writes_every_file_and_runs_nothing() {
    let h = Harness::new(ScriptedRunner::default());
    let summary = h.run("demo", skip_install()).unwrap();

    assert!(h.runner.invocations().is_empty());
    assert_eq!(summary.files_written.len(), 10);

    let manifest = h.fs.read_file(&root().join("package.json")).unwrap();
    assert!(manifest.contains(r#""name": "demo""#));
    assert!(h.fs.exists(&root().join("src/components/Scene.jsx")));

    let templates = r3f_template_set().unwrap();
    for file in templates.files() {
        assert_eq!(
            h.fs.read_file(&root().join(file.path())).as_deref(),
            Some(file.content()),
            "content mismatch for {}",
            file.path().display()
        );
    }
    assert!(h.reporter.any(|e| matches!(e, ProgressEvent::InstallSkipped)));
}

#[test]
fn non_empty_destination_is_rejected_untouched() {
    let fs = MemoryFilesystem::new().with_file(root().join("keep.txt"), "mine");
    let h = Harness::new(ScriptedRunner::healthy()).with_fs(fs);

    let err = h.run("demo", no_delay()).unwrap_err();

    assert!(matches!(
        err,
        MakerError::Application(ApplicationError::DestinationConflict { .. })
    ));
    assert_eq!(h.fs.list_files(), vec![root().join("keep.txt")]);
    assert_eq!(h.fs.read_file(&root().join("keep.txt")).as_deref(), Some("mine"));
    assert!(h.runner.invocations().is_empty());
}

#[test]
fn second_run_conflicts_with_first() {
    let h = Harness::new(ScriptedRunner::default());
    h.run("demo", skip_install()).unwrap();
    assert!(h.run("demo", skip_install()).is_err());
}

#[test]
fn empty_existing_directory_is_filled() {
    let fs = MemoryFilesystem::new().with_dir(root());
    let h = Harness::new(ScriptedRunner::default()).with_fs(fs);
    let summary = h.run("demo", skip_install()).unwrap();
    assert_eq!(summary.files_written.len(), 10);
}

#[test]
fn happy_path_runs_every_phase_in_order() {
    let h = Harness::new(ScriptedRunner::healthy().on("npm run dev", Reply::Interrupted));
    let summary = h.run("demo", no_delay()).unwrap();

    assert_eq!(
        h.runner.commands(),
        vec![
            "node --version",
            "npm --version",
            "npm install",
            "npm audit",
            "npm run dev",
        ]
    );
    assert_eq!(summary.install, Some(InstallOutcome::SucceededPlain));
    assert_eq!(summary.audit, Some(AuditOutcome::Clean));
    assert_eq!(summary.preview, Some(PreviewOutcome::Interrupted));
    assert!(summary.warnings.is_empty());

    let tooling = summary.tooling.unwrap();
    assert_eq!(tooling.strategy, ProbeStrategyKind::Direct);
    assert_eq!(tooling.runtime_version.as_deref(), Some("v20.11.0"));
}

#[test]
fn package_commands_run_inside_project() {
    let h = Harness::new(ScriptedRunner::healthy());
    h.run("demo", no_delay()).unwrap();

    for call in h.runner.invocations() {
        if !call.command.ends_with("--version") {
            assert_eq!(call.spec.cwd(), Some(root().as_path()), "{}", call.command);
        }
    }
}

#[test]
fn preview_is_attached_after_delay() {
    let h = Harness::new(ScriptedRunner::healthy());
    let options = RunOptions {
        preview_delay: Duration::from_secs(3),
        ..RunOptions::default()
    };
    h.run("demo", options).unwrap();

    assert_eq!(h.runner.pauses(), vec![Duration::from_secs(3)]);
    let last = h.runner.invocations().pop().unwrap();
    assert_eq!(last.command, "npm run dev");
    assert_eq!(last.mode, StdioMode::Attached);
}

#[test]
fn relaxed_retry_rescues_install() {
    let runner = ScriptedRunner::healthy().on("npm install", Reply::fail(1, "ERESOLVE"));
    let h = Harness::new(runner);
    let summary = h.run("demo", no_delay()).unwrap();

    assert_eq!(summary.install, Some(InstallOutcome::SucceededRelaxed));
    let commands = h.runner.commands();
    assert_eq!(commands[2..4], ["npm install", "npm install --legacy-peer-deps"]);
    assert!(h.reporter.any(|e| matches!(e, ProgressEvent::RetryingRelaxed { .. })));
}

#[test]
fn install_failure_is_fatal_with_recovery_command() {
    let runner = ScriptedRunner::healthy()
        .on("npm install", Reply::fail(1, "ERESOLVE"))
        .on("npm install --legacy-peer-deps", Reply::fail(1, "ERESOLVE"));
    let h = Harness::new(runner);

    let err = h.run("demo", no_delay()).unwrap_err();
    let suggestions = err.suggestions().join("\n");
    assert!(suggestions.contains("cd demo"));
    assert!(suggestions.contains("npm install --legacy-peer-deps"));

    // No audit or preview after a failed install; files stay for inspection.
    assert!(!h.runner.commands().iter().any(|c| c.contains("audit") || c.contains("run dev")));
    assert!(h.fs.exists(&root().join("package.json")));
}

#[test]
fn audit_findings_are_fixed() {
    let runner = ScriptedRunner::healthy().on("npm audit", Reply::fail(1, "2 high"));
    let h = Harness::new(runner);
    let summary = h.run("demo", no_delay()).unwrap();

    assert_eq!(summary.audit, Some(AuditOutcome::Fixed));
    assert!(h.runner.commands().contains(&"npm audit fix".to_string()));
}

#[test]
fn unfixable_audit_still_succeeds() {
    let runner = ScriptedRunner::healthy()
        .on("npm audit", Reply::fail(1, "2 high"))
        .on("npm audit fix", Reply::fail(1, "manual review required"));
    let h = Harness::new(runner);
    let summary = h.run("demo", no_delay()).unwrap();

    assert_eq!(summary.audit, Some(AuditOutcome::Unfixed));
    assert!(
        summary
            .warnings
            .iter()
            .any(|w| matches!(w, RunWarning::AutoFixFailed { .. }))
    );
    assert!(summary.preview.is_some());
}

#[test]
fn skip_audit_and_dev_server() {
    let h = Harness::new(ScriptedRunner::healthy());
    let options = RunOptions {
        skip_audit: true,
        skip_dev_server: true,
        ..no_delay()
    };
    let summary = h.run("demo", options).unwrap();

    assert_eq!(
        h.runner.commands(),
        vec!["node --version", "npm --version", "npm install"]
    );
    assert!(summary.audit.is_none());
    assert!(summary.preview.is_none());
}

#[test]
fn preview_launch_failure_is_a_warning() {
    let runner = ScriptedRunner::healthy().on("npm run dev", Reply::NotFound);
    let h = Harness::new(runner);
    let summary = h.run("demo", no_delay()).unwrap();

    assert_eq!(summary.preview, Some(PreviewOutcome::LaunchFailed));
    match summary.warnings.last() {
        Some(RunWarning::PreviewLaunchFailed { manual_command, .. }) => {
            assert_eq!(manual_command, "cd demo && npm run dev")
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_tooling_aborts_before_any_write() {
    let h = Harness::new(ScriptedRunner::default());
    let err = h.run("demo", no_delay()).unwrap_err();

    assert!(matches!(
        err,
        MakerError::Application(ApplicationError::ToolingUnavailable { .. })
    ));
    assert!(h.fs.list_files().is_empty());
    assert!(err.suggestions().iter().any(|s| s.contains("--skip-install")));
}

#[test]
#[cfg(unix)]
fn known_location_supplies_package_manager_path() {
    let runner = ScriptedRunner::new(Reply::NotFound)
        .on_line("/opt/node/bin/node --version", Reply::ok_with("v18.19.0"))
        .on_line("/opt/node/bin/npm --version", Reply::ok_with("10.2.4"))
        .on("npm install", Reply::ok());
    let fs = MemoryFilesystem::new().with_dir("/opt/node/bin");
    let probe = ProbeChain::new(vec![
        ProbeStrategy::Direct,
        ProbeStrategy::KnownLocations(vec![
            PathBuf::from("/missing"),
            PathBuf::from("/opt/node/bin"),
        ]),
    ]);
    let h = Harness::new(runner).with_fs(fs).with_probe(probe);

    let options = RunOptions {
        skip_audit: true,
        skip_dev_server: true,
        ..no_delay()
    };
    let summary = h.run("demo", options).unwrap();

    let tooling = summary.tooling.unwrap();
    assert_eq!(tooling.strategy, ProbeStrategyKind::KnownLocations);
    assert_eq!(tooling.location, Some(PathBuf::from("/opt/node/bin")));
    assert!(h.reporter.any(|e| matches!(
        e,
        ProgressEvent::LocationFound { path } if path == Path::new("/opt/node/bin")
    )));

    let install = h
        .runner
        .invocations()
        .into_iter()
        .find(|i| i.command == "npm install")
        .unwrap();
    assert_eq!(install.spec.program(), Path::new("/opt/node/bin/npm"));
}

#[test]
fn trusted_dependency_cache_warns() {
    let fs = MemoryFilesystem::new().with_dir("/work/node_modules");
    let runner = ScriptedRunner::new(Reply::ok())
        .on("node --version", Reply::NotFound)
        .on("npm --version", Reply::NotFound);
    let settings = ProbeSettings {
        trust_dependency_cache: true,
        search_paths: Vec::new(),
    };
    let h = Harness::new(runner)
        .with_fs(fs)
        .with_probe(probe_chain(&settings, Path::new(WORK)));

    let summary = h.run("demo", no_delay()).unwrap();

    assert!(summary.tooling.as_ref().unwrap().is_assumed());
    assert!(matches!(
        summary.warnings.first(),
        Some(RunWarning::ToolingAssumed { .. })
    ));
}

#[test]
fn untrusted_dependency_cache_is_ignored() {
    let fs = MemoryFilesystem::new().with_dir("/work/node_modules");
    let h = Harness::new(ScriptedRunner::default())
        .with_fs(fs)
        .with_probe(probe_chain(&ProbeSettings::default(), Path::new(WORK)));

    assert!(h.run("demo", no_delay()).is_err());
}

#[test]
fn write_failure_leaves_partial_tree() {
    let fs = MemoryFilesystem::new().failing_on(root().join("src/App.jsx"));
    let h = Harness::new(ScriptedRunner::default()).with_fs(fs);

    let err = h.run("demo", skip_install()).unwrap_err();
    assert!(matches!(
        err,
        MakerError::Application(ApplicationError::FilesystemError { .. })
    ));
    assert!(h.fs.exists(&root().join("src/main.jsx")));
    assert!(!h.fs.exists(&root().join("README.md")));
}

#[test]
fn progress_reports_each_file() {
    let h = Harness::new(ScriptedRunner::default());
    h.run("demo", skip_install()).unwrap();

    let written: Vec<PathBuf> = h
        .reporter
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ProgressEvent::FileWritten { path } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(written.len(), 10);
    assert_eq!(written[0], PathBuf::from("package.json"));
}
