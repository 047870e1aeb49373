//! Infrastructure adapters for r3f-maker.
//!
//! This crate implements the ports defined in `maker_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod filesystem;
pub mod platform;
pub mod process;
pub mod reporter;

// Re-export commonly used adapters
pub use builtin_templates::r3f_template_set;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use platform::{ProbeSettings, probe_chain};
pub use process::{InterruptFlag, Reply, ScriptedRunner, SystemRunner};
pub use reporter::{NullReporter, RecordingReporter};
