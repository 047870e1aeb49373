// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for r3f-maker.
//!
//! This module contains pure data and rules with no I/O. Everything that
//! touches the filesystem or spawns a process goes through the ports in
//! `crate::application::ports`.
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: constructed validated, never mutated afterwards

pub mod command;
pub mod error;
pub mod outcome;
pub mod project;
pub mod template_set;
pub mod toolchain;

pub use command::{CommandOutcome, CommandOutput, CommandSpec, StdioMode};
pub use error::{DomainError, ErrorCategory};
pub use outcome::{
    AuditOutcome, InstallOutcome, PreviewOutcome, ProbeStrategyKind, RunSummary, RunWarning,
    ToolingReport,
};
pub use project::{ProjectDescriptor, ProjectName};
pub use template_set::{PackageManifest, TemplateFile, TemplateSet};
pub use toolchain::{PackageManager, Toolchain};
