//! The React Three Fiber starter that ships inside the binary.
//!
//! Payload files live under `templates/r3f/` in this crate and are embedded
//! with `include_str!`, so the tool needs nothing on disk at run time. Dot
//! files are stored without their leading dot (`gitignore`) to keep them
//! visible to packaging tools, and renamed on the way out.

use tracing::{debug, instrument};

use maker_core::domain::{DomainError, PackageManifest, TemplateFile, TemplateSet};

const PACKAGE_MANIFEST: &str = include_str!("../templates/r3f/package.base.json");

/// `(destination path, content)` in write order, after the manifest.
const FILES: &[(&str, &str)] = &[
    (
        "vite.config.js",
        include_str!("../templates/r3f/vite.config.js"),
    ),
    ("index.html", include_str!("../templates/r3f/index.html")),
    ("src/main.jsx", include_str!("../templates/r3f/src/main.jsx")),
    ("src/App.jsx", include_str!("../templates/r3f/src/App.jsx")),
    (
        "src/components/Scene.jsx",
        include_str!("../templates/r3f/src/components/Scene.jsx"),
    ),
    ("src/index.css", include_str!("../templates/r3f/src/index.css")),
    (
        ".eslintrc.json",
        include_str!("../templates/r3f/eslintrc.json"),
    ),
    (".gitignore", include_str!("../templates/r3f/gitignore")),
    ("README.md", include_str!("../templates/r3f/README.md")),
];

/// Build the React Three Fiber template set.
///
/// Only fails if the embedded payload is corrupt, which is a bug.
#[instrument]
pub fn r3f_template_set() -> Result<TemplateSet, DomainError> {
    let manifest = PackageManifest::from_json("package.json", PACKAGE_MANIFEST)?;
    let files = FILES
        .iter()
        .map(|&(path, content)| TemplateFile::new(path, content))
        .collect();

    let set = TemplateSet::new(manifest, files)?;
    debug!(files = set.file_count(), "built-in template set ready");
    Ok(set)
}
