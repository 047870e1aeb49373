//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! and help text.  No business logic lives here.

use clap::{Args, Parser};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "r3f-maker",
    bin_name = "r3f-maker",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Create a React Three Fiber 3D project",
    long_about = "r3f-maker writes a React + Vite + three.js starter into a new \
                  directory, installs its dependencies, audits them, and starts \
                  the development server.",
    after_help = "EXAMPLES:\n\
        \x20 r3f-maker my-scene\n\
        \x20 r3f-maker my-scene --skip-install\n\
        \x20 r3f-maker my-scene --skip-audit --skip-dev-server",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Flags available on every invocation.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// What to create and which phases to run.
    #[command(flatten)]
    pub new: NewArgs,
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for creating a project.
#[derive(Debug, Clone, Args)]
pub struct NewArgs {
    /// Project name.  Becomes `./<NAME>` and the package name.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Skip dependency installation (and therefore the audit and dev server).
    #[arg(long = "skip-install", help = "Skip npm install")]
    pub skip_install: bool,

    /// Skip the vulnerability audit after installing.
    #[arg(long = "skip-audit", help = "Skip vulnerability audit")]
    pub skip_audit: bool,

    /// Do not start the development server at the end.
    #[arg(long = "skip-dev-server", help = "Skip starting dev server")]
    pub skip_dev_server: bool,

    /// Accept a `node_modules` directory in the working directory as
    /// evidence that Node.js is installed.
    #[arg(
        long = "trust-dependency-cache",
        help = "Treat ./node_modules as proof that Node.js is installed"
    )]
    pub trust_dependency_cache: bool,
}

// ── tests ─────────────────────────────────────────────────────────────────────
