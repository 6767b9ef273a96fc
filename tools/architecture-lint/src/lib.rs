//! Hexagonal boundary checks for the network backend.
//!
//! The backend keeps its supply-hierarchy rules in `domain`, drives them from
//! `inbound` (Actix handlers, session guard, OpenAPI wrappers), and stores
//! them through `outbound` (Diesel, in-memory store, Argon2 hasher). This
//! crate parses every file under those three directories and reports:
//!
//! - `domain` code reaching into adapters or web, SQL, or hashing crates
//! - `inbound` code importing `outbound` or talking to the database directly
//! - `outbound` code importing `inbound` or the HTTP stack
//!
//! Test scaffolding (`test_utils.rs`, `tests.rs`, `*_tests.rs`) wires real
//! adapters into handlers and is not checked.
//!
//! Run it with `cargo run -p architecture-lint` from the workspace root.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Name under which integration code imports the backend library.
const BACKEND_CRATE: &str = "network_backend";

const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

/// A single boundary violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: Utf8PathBuf,
    /// Rule that was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Directory traversal or reading failed.
    Io(io::Error),
    /// A file could not be parsed or placed in a layer.
    Parse { file: Utf8PathBuf, message: String },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "architecture lint could not read sources: {err}"),
            Self::Parse { file, message } => write!(f, "cannot lint {file}: {message}"),
            Self::Violations(violations) => {
                writeln!(f, "{} architecture boundary violation(s):", violations.len())?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: Utf8PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint the sources under `backend_dir/src`.
///
/// # Errors
/// Returns [`ArchitectureLintError::Violations`] when any rule is broken, or
/// an I/O or parse error when the tree cannot be read.
pub fn lint_backend_sources(backend_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = Dir::open_ambient_dir(backend_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        if !src.is_dir(layer) {
            continue;
        }
        let dir = src.open_dir(layer)?;
        collect_sources(&dir, Utf8PathBuf::from(layer), &mut sources)?;
    }
    lint_sources(&sources)
}

/// Lint in-memory sources.
///
/// # Errors
/// Same as [`lint_backend_sources`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources.iter().filter(|s| !is_test_scaffolding(&s.file)) {
        let layer =
            Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "file is outside domain, inbound, and outbound".to_owned(),
            })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

fn is_test_scaffolding(file: &Utf8Path) -> bool {
    file.file_stem()
        .is_some_and(|stem| matches!(stem, "test_utils" | "tests") || stem.ends_with("_tests"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    fn of(file: &Utf8Path) -> Option<Self> {
        match file.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    /// Sibling modules of `backend/src` this layer must not name.
    fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound", "middleware", "doc", "settings"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound", "doc"],
        }
    }

    /// External crates this layer must not import.
    fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "actix_session",
                "actix_web",
                "argon2",
                "awc",
                "diesel",
                "diesel_async",
                "diesel_migrations",
                "pagination",
                "pg_embedded_setup_unpriv",
                "utoipa",
            ],
            Self::Inbound => &[
                "argon2",
                "diesel",
                "diesel_async",
                "diesel_migrations",
                "pg_embedded_setup_unpriv",
            ],
            Self::Outbound => &["actix_session", "actix_web", "awc", "utoipa"],
        }
    }
}

fn check_file(file: &Utf8Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for path in &collector.paths {
        if let Some(module) = internal_root(path).filter(|m| layer.forbidden_modules().contains(m))
        {
            messages.insert(format!(
                "{} module must not depend on crate::{module}",
                layer.name()
            ));
        }
        if let Some(krate) = external_root(path).filter(|c| layer.forbidden_crates().contains(c)) {
            messages.insert(format!(
                "{} module must not depend on external crate `{krate}`",
                layer.name()
            ));
        }
    }
    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_owned(),
            message,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First backend module named by `path`, if the path is internal.
fn internal_root(path: &[String]) -> Option<&str> {
    let first = path.first()?.as_str();
    if LAYER_DIRS.contains(&first) {
        return Some(first);
    }
    let start = if is_relative(first) {
        path.iter().position(|s| !is_relative(s))?
    } else if first == BACKEND_CRATE {
        1
    } else {
        return None;
    };
    path.get(start).map(String::as_str)
}

fn external_root(path: &[String]) -> Option<&str> {
    let root = path.first()?.as_str();
    (!is_relative(root) && root != BACKEND_CRATE).then_some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn walk_use(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.walk_use(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.walk_use(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node.segments.iter().map(|s| s.ident.to_string()).collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.walk_use(&node.tree, Vec::new());
    }
}

fn collect_sources(
    dir: &Dir,
    relative: Utf8PathBuf,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name().into_string().map_err(|raw| {
            ArchitectureLintError::Parse {
                file: relative.clone(),
                message: format!("non UTF-8 file name {raw:?}"),
            }
        })?;
        let path = relative.join(&name);
        if entry.file_type()?.is_dir() {
            collect_sources(&entry.open_dir()?, path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&name)?;
            sources.push(LintSource {
                file: path,
                contents,
            });
        }
    }
    Ok(())
}
