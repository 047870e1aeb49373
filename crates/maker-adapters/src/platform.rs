//! Host-platform defaults for the tooling probe.

use std::path::{Path, PathBuf};

use maker_core::application::{ProbeChain, ProbeStrategy};

/// Directory name whose presence the dependency-cache strategy accepts.
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

/// Interpreter used for the last probe attempt on Windows.
pub const SECONDARY_SHELL: &str = "powershell";

/// Inputs for [`probe_chain`] that come from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Enables the dependency-cache heuristic. It can report tooling that
    /// is not there, so it is off unless asked for.
    pub trust_dependency_cache: bool,
    /// Extra installation directories, tried before the host defaults.
    pub search_paths: Vec<PathBuf>,
}

/// The probe chain for this host, in order: direct invocation, known
/// locations, the dependency cache (if trusted), and on Windows a
/// secondary shell.
pub fn probe_chain(settings: &ProbeSettings, cwd: &Path) -> ProbeChain {
    let mut locations = settings.search_paths.clone();
    locations.extend(default_locations(dirs::home_dir().as_deref()));

    let mut strategies = vec![
        ProbeStrategy::Direct,
        ProbeStrategy::KnownLocations(locations),
    ];
    if settings.trust_dependency_cache {
        strategies.push(ProbeStrategy::DependencyCache(cwd.join(DEPENDENCY_CACHE_DIR)));
    }
    if cfg!(windows) {
        strategies.push(ProbeStrategy::SecondaryShell(PathBuf::from(SECONDARY_SHELL)));
    }

    ProbeChain::new(strategies)
}

/// Well-known Node.js installation directories for this platform.
pub fn default_locations(home: Option<&Path>) -> Vec<PathBuf> {
    let (fixed, under_home): (&[&str], &[&str]) = if cfg!(windows) {
        (
            &[r"C:\Program Files\nodejs", r"C:\Program Files (x86)\nodejs"],
            &[
                r"AppData\Roaming\npm",
                r"scoop\apps\nodejs\current",
                r"AppData\Local\Programs\Microsoft VS Code\bin",
            ],
        )
    } else {
        (
            &["/usr/local/bin", "/usr/bin", "/opt/homebrew/bin"],
            &[".volta/bin", ".local/bin"],
        )
    };

    let mut locations: Vec<PathBuf> = fixed.iter().map(PathBuf::from).collect();
    if let Some(home) = home {
        locations.extend(under_home.iter().map(|rel| home.join(rel)));
    }
    locations
}
