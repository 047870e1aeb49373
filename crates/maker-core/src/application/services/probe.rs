//! Tooling probe - a priority-ordered capability-detection chain.
//!
//! PATH configuration differs wildly between hosts, so a single direct
//! invocation check gives false negatives. The chain tries each
//! [`ProbeStrategy`] in order and stops at the first one that succeeds.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem, ProgressEvent, ProgressReporter},
    },
    domain::{
        CommandOutcome, CommandSpec, ProbeStrategyKind, StdioMode, ToolingReport, Toolchain,
    },
    error::MakerResult,
};

/// One way of establishing that the runtime and package manager are usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// Invoke both version commands by bare name.
    Direct,
    /// Invoke the executables inside each listed directory that exists.
    KnownLocations(Vec<PathBuf>),
    /// Accept the presence of this dependency cache directory as evidence.
    DependencyCache(PathBuf),
    /// Retry the version commands through another shell interpreter.
    SecondaryShell(PathBuf),
}

impl ProbeStrategy {
    pub fn kind(&self) -> ProbeStrategyKind {
        match self {
            Self::Direct => ProbeStrategyKind::Direct,
            Self::KnownLocations(_) => ProbeStrategyKind::KnownLocations,
            Self::DependencyCache(_) => ProbeStrategyKind::DependencyCache,
            Self::SecondaryShell(_) => ProbeStrategyKind::SecondaryShell,
        }
    }
}

/// Ordered list of probe strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeChain {
    strategies: Vec<ProbeStrategy>,
}

impl Default for ProbeChain {
    fn default() -> Self {
        Self::direct_only()
    }
}

impl ProbeChain {
    pub fn new(strategies: Vec<ProbeStrategy>) -> Self {
        Self { strategies }
    }

    pub fn direct_only() -> Self {
        Self::new(vec![ProbeStrategy::Direct])
    }

    pub fn strategies(&self) -> &[ProbeStrategy] {
        &self.strategies
    }

    /// Every directory the chain looks in, in order.
    pub fn searched_locations(&self) -> Vec<PathBuf> {
        self.strategies
            .iter()
            .filter_map(|s| match s {
                ProbeStrategy::KnownLocations(dirs) => Some(dirs.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Run the chain, short-circuiting on the first success.
    #[instrument(skip_all, fields(strategies = self.strategies.len()))]
    pub fn probe(
        &self,
        toolchain: &Toolchain,
        runner: &dyn CommandRunner,
        filesystem: &dyn Filesystem,
        reporter: &dyn ProgressReporter,
    ) -> MakerResult<ToolingReport> {
        let prober = Prober {
            toolchain,
            runner,
            filesystem,
            reporter,
        };

        for strategy in &self.strategies {
            reporter.report(&ProgressEvent::ProbeAttempt {
                strategy: strategy.kind(),
            });
            debug!(strategy = %strategy.kind(), "probing for tooling");

            if let Some(report) = prober.attempt(strategy) {
                info!(
                    strategy = %report.strategy,
                    runtime = report.runtime_version.as_deref().unwrap_or("assumed"),
                    "tooling available"
                );
                return Ok(report);
            }
        }

        Err(ApplicationError::ToolingUnavailable {
            runtime: toolchain.runtime().to_owned(),
            package_manager: toolchain.package_manager().to_owned(),
            searched: self.searched_locations(),
        }
        .into())
    }
}

struct Prober<'a> {
    toolchain: &'a Toolchain,
    runner: &'a dyn CommandRunner,
    filesystem: &'a dyn Filesystem,
    reporter: &'a dyn ProgressReporter,
}

impl Prober<'_> {
    fn attempt(&self, strategy: &ProbeStrategy) -> Option<ToolingReport> {
        match strategy {
            ProbeStrategy::Direct => self.direct(),
            ProbeStrategy::KnownLocations(dirs) => {
                dirs.iter().find_map(|dir| self.in_location(dir))
            }
            ProbeStrategy::DependencyCache(dir) => self.dependency_cache(dir),
            ProbeStrategy::SecondaryShell(shell) => self.secondary_shell(shell),
        }
    }

    fn direct(&self) -> Option<ToolingReport> {
        let pm_program = self.toolchain.package_manager_program();
        let runtime_version = self.version(Toolchain::version_query(
            self.toolchain.runtime_program(),
        ))?;
        let pm_version = self.version(Toolchain::version_query(&pm_program))?;

        Some(ToolingReport {
            strategy: ProbeStrategyKind::Direct,
            runtime_version: Some(runtime_version),
            package_manager_version: Some(pm_version),
            package_manager_program: pm_program,
            location: None,
        })
    }

    fn in_location(&self, dir: &Path) -> Option<ToolingReport> {
        if !self.filesystem.exists(dir) {
            return None;
        }
        self.reporter.report(&ProgressEvent::LocationFound {
            path: dir.to_path_buf(),
        });

        let pm_program = self.toolchain.package_manager_in(dir);
        let runtime_version =
            self.version(Toolchain::version_query(self.toolchain.runtime_in(dir)))?;
        let pm_version = self.version(Toolchain::version_query(&pm_program))?;

        Some(ToolingReport {
            strategy: ProbeStrategyKind::KnownLocations,
            runtime_version: Some(runtime_version),
            package_manager_version: Some(pm_version),
            package_manager_program: pm_program,
            location: Some(dir.to_path_buf()),
        })
    }

    fn dependency_cache(&self, dir: &Path) -> Option<ToolingReport> {
        if !self.filesystem.exists(dir) {
            return None;
        }

        Some(ToolingReport {
            strategy: ProbeStrategyKind::DependencyCache,
            runtime_version: None,
            package_manager_version: None,
            package_manager_program: self.toolchain.package_manager_program(),
            location: Some(dir.to_path_buf()),
        })
    }

    fn secondary_shell(&self, shell: &Path) -> Option<ToolingReport> {
        let through_shell = |program: &str| {
            CommandSpec::new(shell).args(["-NoProfile", "-Command", &format!("{program} --version")])
        };

        let runtime_version = self.version(through_shell(self.toolchain.runtime()))?;
        let pm_version = self.version(through_shell(self.toolchain.package_manager()))?;

        Some(ToolingReport {
            strategy: ProbeStrategyKind::SecondaryShell,
            runtime_version: Some(runtime_version),
            package_manager_version: Some(pm_version),
            package_manager_program: self.toolchain.package_manager_program(),
            location: None,
        })
    }

    /// First stdout line of a successful version query.
    fn version(&self, spec: CommandSpec) -> Option<String> {
        match self.runner.run(&spec, StdioMode::Captured) {
            Ok(CommandOutcome::Completed(out)) if out.success() => {
                Some(out.first_line().unwrap_or_default().to_owned())
            }
            Ok(other) => {
                debug!(command = %spec, outcome = ?other, "version query failed");
                None
            }
            Err(e) => {
                debug!(command = %spec, error = %e, "version query could not start");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockCommandRunner, MockFilesystem, MockProgressReporter};
    use crate::domain::CommandOutput;

    fn ok(stdout: &str) -> MakerResult<CommandOutcome> {
        Ok(CommandOutcome::Completed(CommandOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }))
    }

    fn not_found(spec: &CommandSpec) -> MakerResult<CommandOutcome> {
        Err(ApplicationError::CommandSpawn {
            command: spec.to_string(),
            reason: "not found".into(),
        }
        .into())
    }

    fn quiet_reporter() -> MockProgressReporter {
        let mut reporter = MockProgressReporter::new();
        reporter.expect_report().return_const(());
        reporter
    }

    #[test]
    fn direct_success_short_circuits() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(2)
            .returning(|spec, _| {
                if spec.program().to_string_lossy().starts_with("node") {
                    ok("v20.11.0\n")
                } else {
                    ok("10.2.4\n")
                }
            });
        let fs = MockFilesystem::new();
        let chain = ProbeChain::new(vec![
            ProbeStrategy::Direct,
            ProbeStrategy::DependencyCache(PathBuf::from("node_modules")),
        ]);

        let report = chain
            .probe(&Toolchain::default(), &runner, &fs, &quiet_reporter())
            .unwrap();

        assert_eq!(report.strategy, ProbeStrategyKind::Direct);
        assert_eq!(report.runtime_version.as_deref(), Some("v20.11.0"));
        assert_eq!(report.package_manager_version.as_deref(), Some("10.2.4"));
    }

    #[test]
    fn falls_back_to_existing_known_location() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|spec, _| {
            if spec.program().starts_with("/opt/node/bin") {
                ok("v18.19.0")
            } else {
                not_found(spec)
            }
        });
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p != Path::new("/missing"));

        let chain = ProbeChain::new(vec![
            ProbeStrategy::Direct,
            ProbeStrategy::KnownLocations(vec![
                PathBuf::from("/missing"),
                PathBuf::from("/opt/node/bin"),
            ]),
        ]);

        let report = chain
            .probe(&Toolchain::default(), &runner, &fs, &quiet_reporter())
            .unwrap();

        assert_eq!(report.strategy, ProbeStrategyKind::KnownLocations);
        assert_eq!(report.location, Some(PathBuf::from("/opt/node/bin")));
        assert!(report.package_manager_program.starts_with("/opt/node/bin"));
    }

    #[test]
    fn dependency_cache_is_assumed_without_versions() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|spec, _| not_found(spec));
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);

        let chain = ProbeChain::new(vec![
            ProbeStrategy::Direct,
            ProbeStrategy::DependencyCache(PathBuf::from("node_modules")),
        ]);

        let report = chain
            .probe(&Toolchain::default(), &runner, &fs, &quiet_reporter())
            .unwrap();
        assert_eq!(report.strategy, ProbeStrategyKind::DependencyCache);
        assert!(report.is_assumed());
    }

    #[test]
    fn secondary_shell_wraps_version_command() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|spec, _| {
            if spec.program() == Path::new("powershell") {
                assert_eq!(spec.arguments()[0], "-NoProfile");
                ok("v20.0.0")
            } else {
                not_found(spec)
            }
        });
        let fs = MockFilesystem::new();
        let chain = ProbeChain::new(vec![
            ProbeStrategy::Direct,
            ProbeStrategy::SecondaryShell(PathBuf::from("powershell")),
        ]);

        let report = chain
            .probe(&Toolchain::default(), &runner, &fs, &quiet_reporter())
            .unwrap();
        assert_eq!(report.strategy, ProbeStrategyKind::SecondaryShell);
    }

    #[test]
    fn failing_version_command_is_absent() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_, _| {
            Ok(CommandOutcome::Completed(CommandOutput {
                code: Some(1),
                ..Default::default()
            }))
        });
        let fs = MockFilesystem::new();

        let err = ProbeChain::direct_only()
            .probe(&Toolchain::default(), &runner, &fs, &quiet_reporter())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::MakerError::Application(ApplicationError::ToolingUnavailable { .. })
        ));
    }

    #[test]
    fn exhaustion_reports_searched_locations() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|spec, _| not_found(spec));
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);

        let chain = ProbeChain::new(vec![
            ProbeStrategy::Direct,
            ProbeStrategy::KnownLocations(vec![PathBuf::from("/a"), PathBuf::from("/b")]),
            ProbeStrategy::DependencyCache(PathBuf::from("node_modules")),
        ]);

        match chain.probe(&Toolchain::default(), &runner, &fs, &quiet_reporter()) {
            Err(crate::error::MakerError::Application(ApplicationError::ToolingUnavailable {
                searched,
                ..
            })) => assert_eq!(searched, vec![PathBuf::from("/a"), PathBuf::from("/b")]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn each_strategy_is_announced() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|spec, _| not_found(spec));
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let mut reporter = MockProgressReporter::new();
        reporter
            .expect_report()
            .withf(|e| matches!(e, ProgressEvent::ProbeAttempt { .. }))
            .times(2)
            .return_const(());

        let chain = ProbeChain::new(vec![
            ProbeStrategy::Direct,
            ProbeStrategy::DependencyCache(PathBuf::from("node_modules")),
        ]);
        assert!(
            chain
                .probe(&Toolchain::default(), &runner, &fs, &reporter)
                .is_err()
        );
    }
}
