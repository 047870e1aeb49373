//! Runs real child processes with `std::process::Command`.

use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use tracing::{debug, instrument};

use maker_core::{
    application::{ApplicationError, ports::CommandRunner},
    domain::{CommandOutcome, CommandOutput, CommandSpec, StdioMode},
    error::{MakerError, MakerResult},
};

use super::interrupt::{INTERRUPTED_EXIT_CODE, InterruptFlag};

/// Production [`CommandRunner`].
///
/// Children run synchronously with no timeout; a hung child hangs the tool.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    interrupt: InterruptFlag,
}

impl SystemRunner {
    /// Runner whose attached children report operator interrupts through `interrupt`.
    pub fn new(interrupt: InterruptFlag) -> Self {
        Self { interrupt }
    }

    fn run_captured(&self, spec: &CommandSpec, mut command: Command) -> MakerResult<CommandOutcome> {
        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(spec, e))?;

        Ok(CommandOutcome::Completed(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }))
    }

    fn run_attached(&self, spec: &CommandSpec, mut command: Command) -> MakerResult<CommandOutcome> {
        let guard = self.interrupt.arm();
        let status = command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(spec, e))?;

        if guard.fired() || killed_by_interrupt(&status) {
            debug!(command = %spec, "interrupted by operator");
            guard.absorb_pending();
            return Ok(CommandOutcome::Interrupted);
        }

        Ok(CommandOutcome::Completed(CommandOutput {
            code: status.code(),
            ..CommandOutput::default()
        }))
    }
}

impl CommandRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %spec, mode = ?mode))]
    fn run(&self, spec: &CommandSpec, mode: StdioMode) -> MakerResult<CommandOutcome> {
        let mut command = Command::new(spec.program());
        command.args(spec.arguments());
        if let Some(cwd) = spec.cwd() {
            command.current_dir(cwd);
        }

        match mode {
            StdioMode::Captured => self.run_captured(spec, command),
            StdioMode::Attached => self.run_attached(spec, command),
        }
    }

    fn pause(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

fn spawn_error(spec: &CommandSpec, e: std::io::Error) -> MakerError {
    ApplicationError::CommandSpawn {
        command: spec.to_string(),
        reason: e.to_string(),
    }
    .into()
}

/// Died from SIGINT, or exited with the conventional 130 after handling it.
fn killed_by_interrupt(status: &ExitStatus) -> bool {
    status.code() == Some(INTERRUPTED_EXIT_CODE) || died_from_sigint(status)
}

#[cfg(unix)]
fn died_from_sigint(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    const SIGINT: i32 = 2;
    status.signal() == Some(SIGINT)
}

#[cfg(not(unix))]
fn died_from_sigint(_status: &ExitStatus) -> bool {
    false
}
