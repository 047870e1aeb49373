//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the values derived from
//! it ([`Toolchain`], delays, probe settings).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `R3F_MAKER_<SECTION>__<KEY>`
//! 3. Config file: `--config FILE`, else `<config dir>/r3f-maker/config.toml`
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use maker_core::domain::Toolchain;

use crate::error::{CliError, CliResult};

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "R3F_MAKER";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// External runtime and package manager.
    pub toolchain: ToolchainConfig,
    /// Development-server launch.
    pub preview: PreviewConfig,
    /// Tooling detection.
    pub probe: ProbeConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub runtime: String,
    pub package_manager: String,
    /// Appended to the install command on the single retry.
    pub relaxed_flag: String,
    /// Manifest script that starts the dev server.
    pub dev_script: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        let toolchain = Toolchain::default();
        Self {
            runtime: toolchain.runtime().into(),
            package_manager: toolchain.package_manager().into(),
            relaxed_flag: toolchain.relaxed_flag().into(),
            dev_script: toolchain.dev_script().into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Pause before the dev server starts.
    pub delay_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            delay_secs: maker_core::application::services::DEFAULT_PREVIEW_DELAY.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Accept `./node_modules` as evidence that the tooling works.
    pub trust_dependency_cache: bool,
    /// Extra installation directories, searched before the host defaults.
    pub search_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from the file chain and the process environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        Self::load_from(config_file, Self::environment())
    }

    /// Load with an explicit environment source.
    pub fn load_from(config_file: Option<&PathBuf>, env: Environment) -> CliResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let (path, required) = match config_file {
            Some(path) => (Some(path.clone()), true),
            None => (Self::config_path(), false),
        };
        if let Some(path) = &path {
            debug!(path = %path.display(), required, "config file");
            builder = builder.add_source(File::from(path.as_path()).required(required));
        }

        builder
            .add_source(env)
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| CliError::ConfigError {
                message: e.to_string(),
                path,
                source: Some(Box::new(e)),
            })
    }

    /// `R3F_MAKER_*` variables; `__` separates nested keys and
    /// `probe.search_paths` is a comma-separated list.
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("probe.search_paths")
    }

    /// Path to the default configuration file, if the platform has a
    /// config directory.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "r3f-maker", "r3f-maker")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn toolchain(&self) -> Toolchain {
        let tc = &self.toolchain;
        Toolchain::new(&tc.runtime, &tc.package_manager)
            .with_relaxed_flag(&tc.relaxed_flag)
            .with_dev_script(&tc.dev_script)
    }

    pub fn preview_delay(&self) -> Duration {
        Duration::from_secs(self.preview.delay_secs)
    }

    /// Configured search paths, relative entries resolved against `cwd`.
    pub fn search_paths(&self, cwd: &Path) -> Vec<PathBuf> {
        self.probe.search_paths.iter().map(|p| cwd.join(p)).collect()
    }
}
