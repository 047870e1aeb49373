//! r3f-maker core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers for the r3f-maker
//! project scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           maker-cli (CLI)               │
//! │   (argument parsing, terminal output)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │        (Materializer, ProbeChain)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ (Filesystem, CommandRunner, Reporter)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     maker-adapters (Infrastructure)     │
//! │  (LocalFilesystem, SystemRunner, etc)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use maker_core::prelude::*;
//! # fn adapters() -> (TemplateSet, Box<dyn Filesystem>, Box<dyn CommandRunner>, Box<dyn ProgressReporter>) { unimplemented!() }
//!
//! let (templates, filesystem, runner, reporter) = adapters();
//! let name = ProjectName::new("demo").unwrap();
//! let project = ProjectDescriptor::in_dir(name, std::env::current_dir().unwrap());
//!
//! let materializer = Materializer::new(templates, filesystem, runner, reporter);
//! let summary = materializer.materialize(&project, &RunOptions::default()).unwrap();
//! println!("{} files written", summary.files_written.len());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, Materializer, ProbeChain, ProbeStrategy, RunOptions,
        ports::{CommandRunner, Filesystem, PathState, ProgressEvent, ProgressReporter},
    };
    pub use crate::domain::{
        CommandOutcome, CommandOutput, CommandSpec, DomainError, ProjectDescriptor, ProjectName,
        RunSummary, RunWarning, StdioMode, TemplateSet, Toolchain,
    };
    pub use crate::error::{MakerError, MakerResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
