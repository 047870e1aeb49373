//! The external runtime and package manager the generated project needs.

use std::path::{Path, PathBuf};

use crate::domain::command::CommandSpec;

/// Names and flags of the JavaScript tooling, as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    runtime: String,
    package_manager: String,
    relaxed_flag: String,
    dev_script: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            runtime: "node".into(),
            package_manager: "npm".into(),
            relaxed_flag: "--legacy-peer-deps".into(),
            dev_script: "dev".into(),
        }
    }
}

impl Toolchain {
    pub fn new(runtime: impl Into<String>, package_manager: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            package_manager: package_manager.into(),
            ..Self::default()
        }
    }

    pub fn with_relaxed_flag(mut self, flag: impl Into<String>) -> Self {
        self.relaxed_flag = flag.into();
        self
    }

    pub fn with_dev_script(mut self, script: impl Into<String>) -> Self {
        self.dev_script = script.into();
        self
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn package_manager(&self) -> &str {
        &self.package_manager
    }

    pub fn relaxed_flag(&self) -> &str {
        &self.relaxed_flag
    }

    pub fn dev_script(&self) -> &str {
        &self.dev_script
    }

    /// Runtime program as invoked by bare name.
    pub fn runtime_program(&self) -> PathBuf {
        PathBuf::from(&self.runtime)
    }

    /// Package-manager program as invoked by bare name.
    ///
    /// npm ships as a `.cmd` shim on Windows, which is not found without
    /// the extension.
    pub fn package_manager_program(&self) -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(format!("{}.cmd", self.package_manager))
        } else {
            PathBuf::from(&self.package_manager)
        }
    }

    /// Runtime executable inside an explicit installation directory.
    pub fn runtime_in(&self, dir: &Path) -> PathBuf {
        if cfg!(windows) {
            dir.join(format!("{}.exe", self.runtime))
        } else {
            dir.join(&self.runtime)
        }
    }

    /// Package-manager executable inside an explicit installation directory.
    pub fn package_manager_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.package_manager_program())
    }

    /// `<program> --version`.
    pub fn version_query(program: impl Into<PathBuf>) -> CommandSpec {
        CommandSpec::new(program).arg("--version")
    }

    /// Bind the toolchain to the package-manager program found by probing.
    pub fn package_manager_at(&self, program: impl Into<PathBuf>) -> PackageManager {
        PackageManager {
            program: program.into(),
            display_name: self.package_manager.clone(),
            relaxed_flag: self.relaxed_flag.clone(),
            dev_script: self.dev_script.clone(),
        }
    }

    /// Package manager invoked by bare name.
    pub fn default_package_manager(&self) -> PackageManager {
        self.package_manager_at(self.package_manager_program())
    }
}

/// Builds the package-manager commands run inside a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    program: PathBuf,
    display_name: String,
    relaxed_flag: String,
    dev_script: String,
}

impl PackageManager {
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn relaxed_flag(&self) -> &str {
        &self.relaxed_flag
    }

    pub fn install(&self, cwd: &Path) -> CommandSpec {
        self.command(cwd, &["install"])
    }

    pub fn install_relaxed(&self, cwd: &Path) -> CommandSpec {
        self.command(cwd, &["install", &self.relaxed_flag])
    }

    pub fn audit(&self, cwd: &Path) -> CommandSpec {
        self.command(cwd, &["audit"])
    }

    pub fn audit_fix(&self, cwd: &Path) -> CommandSpec {
        self.command(cwd, &["audit", "fix"])
    }

    pub fn dev_server(&self, cwd: &Path) -> CommandSpec {
        self.command(cwd, &["run", &self.dev_script])
    }

    /// Command text for the operator to type by hand, e.g.
    /// `npm install --legacy-peer-deps`.
    pub fn manual_install_relaxed(&self) -> String {
        format!("{} install {}", self.display_name, self.relaxed_flag)
    }

    pub fn manual_install(&self) -> String {
        format!("{} install", self.display_name)
    }

    pub fn manual_dev_server(&self) -> String {
        format!("{} run {}", self.display_name, self.dev_script)
    }

    pub fn manual_run(&self, script: &str) -> String {
        format!("{} run {}", self.display_name, script)
    }

    pub fn manual_audit(&self) -> String {
        format!("{} audit", self.display_name)
    }

    fn command(&self, cwd: &Path, args: &[&str]) -> CommandSpec {
        CommandSpec::new(&self.program)
            .args(args.iter().copied())
            .current_dir(cwd)
    }
}
