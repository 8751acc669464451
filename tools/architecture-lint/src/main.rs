//! CLI entry point for the repo-local architecture lint.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use thiserror::Error;

/// Workspace member holding the registry crate.
const REGISTRY_MEMBER: &str = "registry";

fn main() -> ExitCode {
    let outcome = repo_root()
        .map_err(|err| err.to_string())
        .and_then(|root| {
            architecture_lint::lint_crate_sources(&root.join(REGISTRY_MEMBER))
                .map_err(|err| err.to_string())
        });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{message}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy, Error)]
#[error("unable to locate workspace root (directory containing a workspace Cargo.toml)")]
struct RepoRootError;

fn repo_root() -> Result<PathBuf, RepoRootError> {
    let from_env = std::env::var("CARGO_WORKSPACE_DIR").ok().map(PathBuf::from);
    let from_cwd = std::env::current_dir().ok();
    let from_manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    from_env
        .as_deref()
        .and_then(find_workspace_root)
        .or_else(|| from_cwd.as_deref().and_then(find_workspace_root))
        .or_else(|| find_workspace_root(&from_manifest))
        .ok_or(RepoRootError)
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| cargo_toml_declares_workspace(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn cargo_toml_declares_workspace(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .is_some_and(|contents| contents.contains("[workspace]"))
}
