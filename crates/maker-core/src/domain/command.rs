//! External command descriptions and their results.
//!
//! The core never spawns anything itself; it hands a [`CommandSpec`] to the
//! `CommandRunner` port and decides, per call site, whether the
//! [`CommandOutcome`] is fatal, a warning, or fine.

use std::fmt;
use std::path::{Path, PathBuf};

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// stdout/stderr are collected and returned in [`CommandOutput`].
    Captured,
    /// The child shares the operator's terminal; nothing is collected.
    Attached,
}

/// A program invocation: what to run, with which arguments, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

/// Renders like a shell line: `npm install --legacy-peer-deps`.
///
/// Programs or arguments containing whitespace are double-quoted.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_word(f, &self.program.display().to_string())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_word(f, arg)?;
        }
        Ok(())
    }
}

fn write_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    if word.chars().any(char::is_whitespace) {
        write!(f, "\"{word}\"")
    } else {
        f.write_str(word)
    }
}

/// Exit status plus whatever the child printed (empty when attached).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stdout, or `None` when it is empty.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Result of running a command to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed(CommandOutput),
    /// The operator sent an interrupt while the command was running.
    Interrupted,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed(out) if out.success())
    }

    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            Self::Completed(out) => Some(out),
            Self::Interrupted => None,
        }
    }
}
