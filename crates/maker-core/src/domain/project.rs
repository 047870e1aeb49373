//! Project identity: the validated name and the destination it maps to.
//!
//! # Design
//!
//! `ProjectName` is a value object. Once constructed, it is known to be
//! usable both as a single directory component and as the package name in
//! the generated manifest. `ProjectDescriptor` pairs it with the absolute
//! destination directory and is never mutated after creation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::error::DomainError;

/// npm refuses package names longer than this.
const MAX_NAME_LEN: usize = 214;

/// Characters that are not portable in a directory name.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '/', '\\'];

// ── ProjectName ───────────────────────────────────────────────────────────────

/// A project name that is safe to use as a single path component and
/// can be pasted into a shell command without quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let invalid = |reason: &str| DomainError::InvalidProjectName {
            name: raw.clone(),
            reason: reason.into(),
        };

        if raw.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid("name cannot contain whitespace"));
        }
        if raw.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if raw.chars().count() > MAX_NAME_LEN {
            return Err(invalid("name cannot be longer than 214 characters"));
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(invalid("name cannot contain path separators"));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| c.is_control() || FORBIDDEN_CHARS.contains(c))
        {
            return Err(invalid(&format!("name cannot contain {c:?}")));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── ProjectDescriptor ─────────────────────────────────────────────────────────

/// The project to materialize: its name and absolute destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    name: ProjectName,
    root: PathBuf,
}

impl ProjectDescriptor {
    /// Place the project directly under `base` (normally the working directory).
    pub fn in_dir(name: ProjectName, base: impl AsRef<Path>) -> Self {
        let root = base.as_ref().join(name.as_str());
        Self { name, root }
    }

    pub fn name(&self) -> &ProjectName {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
