//! Scripted [`CommandRunner`] for tests: canned replies, recorded calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use maker_core::{
    application::{ApplicationError, ports::CommandRunner},
    domain::{CommandOutcome, CommandOutput, CommandSpec, StdioMode},
    error::MakerResult,
};

/// What a scripted command does when run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    Interrupted,
    /// The program cannot be started.
    NotFound,
}

impl Reply {
    pub fn ok() -> Self {
        Self::ok_with("")
    }

    pub fn ok_with(stdout: impl Into<String>) -> Self {
        Self::Exit {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn fail(code: i32, stderr: impl Into<String>) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program stem plus arguments, e.g. `npm install`.
    pub command: String,
    pub spec: CommandSpec,
    pub mode: StdioMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    /// Program stem plus arguments.
    Key(String),
    /// The full rendered command line.
    Line(String),
}

#[derive(Debug)]
struct Inner {
    rules: Vec<(Matcher, Reply)>,
    fallback: Reply,
    calls: Vec<Invocation>,
    pauses: Vec<Duration>,
}

/// Replies are keyed by the program's file stem and its arguments, so
/// `/usr/local/bin/npm install` and `npm.cmd install` both match
/// `"npm install"`. [`on_line`](Self::on_line) matches the full command
/// line instead. Unmatched commands get the fallback reply.
///
/// Clones share state.
#[derive(Debug, Clone)]
pub struct ScriptedRunner {
    inner: Arc<Mutex<Inner>>,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new(Reply::NotFound)
    }
}

impl ScriptedRunner {
    pub fn new(fallback: Reply) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                rules: Vec::new(),
                fallback,
                calls: Vec::new(),
                pauses: Vec::new(),
            })),
        }
    }

    /// A host where node and npm answer and every other command succeeds.
    pub fn healthy() -> Self {
        Self::new(Reply::ok())
            .on("node --version", Reply::ok_with("v20.11.0\n"))
            .on("npm --version", Reply::ok_with("10.2.4\n"))
    }

    /// Reply to `command` with `reply`. Later rules override earlier ones.
    pub fn on(self, command: &str, reply: Reply) -> Self {
        self.rule(Matcher::Key(command.to_owned()), reply)
    }

    /// Reply to the exact command line, program path included.
    pub fn on_line(self, line: &str, reply: Reply) -> Self {
        self.rule(Matcher::Line(line.to_owned()), reply)
    }

    fn rule(self, matcher: Matcher, reply: Reply) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.rules.push((matcher, reply));
        }
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    /// Just the command keys, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.command).collect()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.inner
            .lock()
            .map(|inner| inner.pauses.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec, mode: StdioMode) -> MakerResult<CommandOutcome> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        let command = key(spec);
        let line = spec.to_string();
        let reply = inner
            .rules
            .iter()
            .rev()
            .find(|(matcher, _)| match matcher {
                Matcher::Key(k) => *k == command,
                Matcher::Line(l) => *l == line,
            })
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| inner.fallback.clone());

        inner.calls.push(Invocation {
            command,
            spec: spec.clone(),
            mode,
        });

        match reply {
            Reply::Exit {
                code,
                stdout,
                stderr,
            } => Ok(CommandOutcome::Completed(CommandOutput {
                code: Some(code),
                stdout,
                stderr,
            })),
            Reply::Interrupted => Ok(CommandOutcome::Interrupted),
            Reply::NotFound => Err(ApplicationError::CommandSpawn {
                command: line,
                reason: "program not found".into(),
            }
            .into()),
        }
    }

    fn pause(&self, delay: Duration) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.pauses.push(delay);
        }
    }
}

fn key(spec: &CommandSpec) -> String {
    let program = spec
        .program()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| spec.program().display().to_string());

    std::iter::once(program)
        .chain(spec.arguments().iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_rules_win_and_calls_are_recorded() {
        let runner = ScriptedRunner::new(Reply::ok())
            .on("npm install", Reply::fail(1, "ERESOLVE"))
            .on("npm install", Reply::ok());

        let spec = CommandSpec::new("/opt/node/bin/npm").arg("install");
        assert!(runner.run(&spec, StdioMode::Captured).unwrap().succeeded());
        assert_eq!(runner.commands(), vec!["npm install"]);
    }

    #[test]
    fn windows_shim_matches_plain_name() {
        let runner = ScriptedRunner::new(Reply::NotFound).on("npm audit", Reply::ok());
        let spec = CommandSpec::new("npm.cmd").arg("audit");
        assert!(runner.run(&spec, StdioMode::Captured).is_ok());
    }

    #[test]
    fn unmatched_uses_fallback() {
        let runner = ScriptedRunner::default();
        assert!(
            runner
                .run(&CommandSpec::new("node").arg("--version"), StdioMode::Captured)
                .is_err()
        );
    }
}
