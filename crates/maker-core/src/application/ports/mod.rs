//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `maker-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: destination inspection and file writes
//!   - `CommandRunner`: synchronous child processes
//!   - `ProgressReporter`: operator-facing progress output

pub mod output;

pub use output::{CommandRunner, Filesystem, PathState, ProgressEvent, ProgressReporter};

#[cfg(test)]
pub use output::{MockCommandRunner, MockFilesystem, MockProgressReporter};
