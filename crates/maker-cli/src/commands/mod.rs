//! Command handlers.
//!
//! Each handler translates parsed arguments into core calls. No business
//! logic lives here.

pub mod new;
