//! `cargo run -p architecture-lint`: check the backend's layer boundaries.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};

fn main() -> ExitCode {
    let backend_dir = match repo_root() {
        Ok(root) => root.join("backend"),
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "{err}");
            return ExitCode::FAILURE;
        }
    };
    match architecture_lint::lint_backend_sources(&backend_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "{err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RepoRootError;

impl fmt::Display for RepoRootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no Cargo.toml with a [workspace] table above the current directory"
        )
    }
}

impl std::error::Error for RepoRootError {}

fn repo_root() -> Result<Utf8PathBuf, RepoRootError> {
    let from_env = std::env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from);
    let from_cwd = std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());
    let from_manifest = Some(Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    from_env
        .as_deref()
        .and_then(find_workspace_root)
        .or_else(|| from_cwd.as_deref().and_then(find_workspace_root))
        .or_else(|| from_manifest.as_deref().and_then(find_workspace_root))
        .ok_or(RepoRootError)
}

fn find_workspace_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let manifest = dir.join("Cargo.toml");
        if manifest.is_file() && cargo_toml_declares_workspace(&manifest) {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn cargo_toml_declares_workspace(path: &Utf8Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .is_some_and(|contents| contents.contains("[workspace]"))
}
