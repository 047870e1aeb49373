//! Application services - orchestrate use cases.
//!
//! The [`Materializer`] drives one run; the [`ProbeChain`] decides whether
//! the external tooling is usable; the install/audit/preview steps live in
//! a crate-private module because only the materializer sequences them.

pub mod materializer;
pub mod probe;
mod steps;

pub use materializer::{DEFAULT_PREVIEW_DELAY, Materializer, RunOptions};
pub use probe::{ProbeChain, ProbeStrategy};
