//! Application layer for r3f-maker.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Materializer, ProbeChain)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer sequences the domain layer and the ports but owns
//! no I/O. Naming and template rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{Materializer, ProbeChain, ProbeStrategy, RunOptions};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, Filesystem, PathState, ProgressEvent, ProgressReporter};

pub use error::ApplicationError;
