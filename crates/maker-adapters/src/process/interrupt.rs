//! Operator interrupts (Ctrl+C).
//!
//! One process-wide handler is installed. While an attached child runs the
//! flag is *armed*: the interrupt reaches the child through the shared
//! terminal and the handler only records that it happened. Outside that
//! window the tool exits at once with status 130.
//!
//! The handler runs on its own thread and can lag behind the child's exit.
//! Once a child is known to have been interrupted, the flag stays armed so
//! that the late handler call is recorded instead of exiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Exit status used for an interrupt outside the preview phase.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    armed: Arc<AtomicBool>,
    fired: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Install the process-wide Ctrl+C handler.
    ///
    /// Fails if a handler is already installed.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let flag = Self::default();
        let armed = Arc::clone(&flag.armed);
        let fired = Arc::clone(&flag.fired);

        ctrlc::set_handler(move || {
            if armed.load(Ordering::SeqCst) {
                fired.store(true, Ordering::SeqCst);
            } else {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })?;

        debug!("interrupt handler installed");
        Ok(flag)
    }

    /// A flag with no handler behind it; `fired` only changes via [`trigger`](Self::trigger).
    pub fn detached() -> Self {
        Self::default()
    }

    /// Arm for the lifetime of the returned guard. Clears any earlier interrupt.
    pub fn arm(&self) -> ArmedGuard<'_> {
        self.fired.store(false, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
        ArmedGuard {
            flag: self,
            keep_armed: false,
        }
    }

    pub fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Record an interrupt as the handler would.
    pub fn trigger(&self) {
        if self.armed.load(Ordering::SeqCst) {
            self.fired.store(true, Ordering::SeqCst);
        }
    }
}

/// Disarms the flag when dropped.
#[derive(Debug)]
pub struct ArmedGuard<'a> {
    flag: &'a InterruptFlag,
    keep_armed: bool,
}

impl ArmedGuard<'_> {
    pub fn fired(&self) -> bool {
        self.flag.fired()
    }

    /// Leave the flag armed after the guard is gone, so an interrupt that
    /// is still in flight never terminates the process.
    pub fn absorb_pending(mut self) {
        self.keep_armed = true;
    }
}

impl Drop for ArmedGuard<'_> {
    fn drop(&mut self) {
        if !self.keep_armed {
            self.flag.armed.store(false, Ordering::SeqCst);
        }
    }
}
