//! The fixed set of files written into every new project.
//!
//! A [`TemplateSet`] is built once at startup (see
//! `maker_adapters::builtin_templates`) and only read afterwards. It carries
//! one structured entry, the [`PackageManifest`], whose `name` field is
//! replaced with the project name at render time, plus an ordered list of
//! literal [`TemplateFile`]s.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde_json::{Map, Value};

use crate::domain::{error::DomainError, project::ProjectName};

// ── TemplateFile ──────────────────────────────────────────────────────────────

/// One literal file: a path relative to the project root and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    path: PathBuf,
    content: Cow<'static, str>,
}

impl TemplateFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

// ── PackageManifest ───────────────────────────────────────────────────────────

/// The base dependency manifest.
///
/// Key order of the base document is preserved so the rendered file matches
/// the base byte-for-byte apart from the `name` value.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    path: PathBuf,
    base: Map<String, Value>,
}

impl PackageManifest {
    /// Parse the base manifest. It must be a JSON object.
    pub fn from_json(path: impl Into<PathBuf>, base: &str) -> Result<Self, DomainError> {
        let value: Value =
            serde_json::from_str(base).map_err(|e| DomainError::InvalidManifest {
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(base) => Ok(Self {
                path: path.into(),
                base,
            }),
            other => Err(DomainError::InvalidManifest {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the base, overwrite `name`, and pretty-print with two-space indent.
    pub fn render_for(&self, name: &ProjectName) -> Result<String, DomainError> {
        let mut manifest = self.base.clone();
        manifest.insert("name".into(), Value::String(name.as_str().to_owned()));

        serde_json::to_string_pretty(&Value::Object(manifest)).map_err(|e| {
            DomainError::InvalidManifest {
                reason: e.to_string(),
            }
        })
    }

    /// Script names declared under `scripts`, in declaration order.
    pub fn scripts(&self) -> Vec<&str> {
        self.base
            .get("scripts")
            .and_then(Value::as_object)
            .map(|scripts| scripts.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── TemplateSet ───────────────────────────────────────────────────────────────

/// Ordered, validated collection of everything a project is made of.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    manifest: PackageManifest,
    files: Vec<TemplateFile>,
}

impl TemplateSet {
    pub fn new(manifest: PackageManifest, files: Vec<TemplateFile>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        let paths = std::iter::once(manifest.path()).chain(files.iter().map(TemplateFile::path));

        for path in paths {
            validate_relative(path)?;
            if !seen.insert(path.to_path_buf()) {
                return Err(DomainError::DuplicatePath {
                    path: path.display().to_string(),
                });
            }
        }

        if files.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "template set has no files".into(),
            ));
        }

        Ok(Self { manifest, files })
    }

    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    /// Number of files written per project, manifest included.
    pub fn file_count(&self) -> usize {
        self.files.len() + 1
    }

    /// Distinct parent directories (relative), shallowest first.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .files
            .iter()
            .filter_map(|f| f.path().parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        dirs.sort_by(|a, b| {
            a.components()
                .count()
                .cmp(&b.components().count())
                .then_with(|| a.cmp(b))
        });
        dirs.dedup();
        dirs
    }
}

fn validate_relative(path: &Path) -> Result<(), DomainError> {
    if path.as_os_str().is_empty() {
        return Err(DomainError::InvalidTemplate("empty file path".into()));
    }
    if path.is_absolute() || path.has_root() {
        return Err(DomainError::AbsolutePathNotAllowed {
            path: path.display().to_string(),
        });
    }
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(DomainError::PathEscapesRoot {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
