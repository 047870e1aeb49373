//! Process adapters: the real child-process runner and a scripted double.

mod interrupt;
mod scripted;
mod system;

pub use interrupt::InterruptFlag;
pub use scripted::{Invocation, Reply, ScriptedRunner};
pub use system::SystemRunner;
