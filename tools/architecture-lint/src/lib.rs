//! Repo-local architectural lint for the gift registry's hexagonal layout.
//!
//! The registry crate keeps its state model and transitions in `domain`,
//! drives them from the CLI in `inbound`, and reaches Open Library through
//! `outbound`. This crate parses every source under those directories and:
//!
//! - forbids `domain` code from depending on adapter modules (`inbound`,
//!   `outbound`), the runtime `config` module, or HTTP, CLI, and process
//!   bootstrap crates
//! - forbids `inbound` adapters from importing `outbound` modules or the
//!   HTTP client directly
//! - forbids `outbound` adapters from importing `inbound` modules or CLI
//!   parsing crates
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::{self, Visit};
use thiserror::Error;

/// Name the registry crate is imported under from its own binaries and tests.
const CRATE_NAME: &str = "gift_registry";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to the crate's `src/` directory.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to the crate's `src/` directory.
    pub file: PathBuf,
    /// Full file contents.
    pub contents: String,
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Walking or reading the source tree failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// A source file could not be assigned a layer or parsed.
    #[error("failed to parse Rust source while linting architecture ({}): {message}", .file.display())]
    Parse {
        /// Offending file.
        file: PathBuf,
        /// What went wrong.
        message: String,
    },
    /// At least one boundary was crossed.
    #[error("{}", render_report(.0))]
    Violations(Vec<Violation>),
}

impl ArchitectureLintError {
    fn parse(file: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.to_path_buf(),
            message: message.into(),
        }
    }
}

fn render_report(violations: &[Violation]) -> String {
    let lines: String = violations
        .iter()
        .map(|violation| format!("- {violation}\n"))
        .collect();
    format!("Architecture boundary violations:\n{lines}")
}

/// Lint the registry crate sources on disk.
///
/// `crate_dir` must be the directory holding the crate's `Cargo.toml`.
///
/// # Errors
///
/// Returns [`ArchitectureLintError`] when sources cannot be read or parsed,
/// or when any boundary is crossed.
pub fn lint_crate_sources(crate_dir: &Path) -> Result<(), ArchitectureLintError> {
    let sources = read_layer_sources(&crate_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
///
/// # Errors
///
/// Returns [`ArchitectureLintError`] when a file sits outside the known
/// layers, fails to parse, or crosses a boundary.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        violations.extend(check_source(source)?);
    }
    if violations.is_empty() {
        return Ok(());
    }
    Err(ArchitectureLintError::Violations(violations))
}

fn check_source(source: &LintSource) -> Result<Vec<Violation>, ArchitectureLintError> {
    let layer = Layer::of(&source.file).ok_or_else(|| {
        ArchitectureLintError::parse(&source.file, "unable to infer module layer from file path")
    })?;
    let syntax = syn::parse_file(&source.contents)
        .map_err(|err| ArchitectureLintError::parse(&source.file, err.to_string()))?;

    let mut visitor = DependencyVisitor::default();
    visitor.visit_file(&syntax);

    let rules = layer.rules();
    Ok(visitor
        .dependencies
        .iter()
        .filter(|dependency| rules.forbids(dependency))
        .map(|dependency| Violation {
            file: source.file.clone(),
            message: format!("{} module must not depend on {dependency}", rules.name),
        })
        .collect())
}

/// Layer a source file belongs to, keyed by its first directory under `src/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    fn of(relative_path: &Path) -> Option<Self> {
        let top = relative_path.iter().next().and_then(OsStr::to_str)?;
        Self::ALL
            .into_iter()
            .find(|layer| layer.rules().name == top)
    }

    const fn rules(self) -> LayerRules {
        match self {
            Self::Domain => LayerRules {
                name: "domain",
                modules: &["config", "inbound", "outbound"],
                crates: &[
                    "clap",
                    "color_eyre",
                    "ortho_config",
                    "reqwest",
                    "tracing_subscriber",
                ],
            },
            Self::Inbound => LayerRules {
                name: "inbound",
                modules: &["outbound"],
                crates: &["color_eyre", "reqwest", "tracing_subscriber"],
            },
            Self::Outbound => LayerRules {
                name: "outbound",
                modules: &["inbound"],
                crates: &["clap", "color_eyre", "ortho_config"],
            },
        }
    }
}

struct LayerRules {
    name: &'static str,
    modules: &'static [&'static str],
    crates: &'static [&'static str],
}

impl LayerRules {
    fn forbids(&self, dependency: &Dependency) -> bool {
        match dependency {
            Dependency::Module(root) => self.modules.contains(&root.as_str()),
            Dependency::Crate(root) => self.crates.contains(&root.as_str()),
        }
    }
}

/// The root a path resolves to: a module of the registry crate or another crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Dependency {
    Module(String),
    Crate(String),
}

impl Dependency {
    /// Classify a path by its leading segments.
    ///
    /// `crate::`, `self::`, and `super::` chains and the registry crate name
    /// resolve to a module of the registry. A leading layer directory name
    /// counts as that module only when a path continues past it, so a local
    /// binding named `outbound` is not a dependency. Anything else names an
    /// external crate.
    fn classify(segments: &[String]) -> Option<Self> {
        let (head, rest) = segments.split_first()?;
        if Layer::ALL.iter().any(|layer| layer.rules().name == head.as_str()) {
            return (!rest.is_empty()).then(|| Self::Module(head.clone()));
        }
        if head == CRATE_NAME {
            return rest.first().cloned().map(Self::Module);
        }
        if is_relative(head) {
            return rest
                .iter()
                .find(|segment| !is_relative(segment))
                .cloned()
                .map(Self::Module);
        }
        Some(Self::Crate(head.clone()))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(root) => write!(f, "crate::{root}"),
            Self::Crate(root) => write!(f, "external crate `{root}`"),
        }
    }
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Collects the distinct dependency roots named anywhere in a file.
#[derive(Default)]
struct DependencyVisitor {
    dependencies: BTreeSet<Dependency>,
}

impl DependencyVisitor {
    fn record(&mut self, segments: &[String]) {
        if let Some(dependency) = Dependency::classify(segments) {
            self.dependencies.insert(dependency);
        }
    }
}

impl<'ast> Visit<'ast> for DependencyVisitor {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        self.record(&segments);
        visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        for segments in use_paths(&node.tree) {
            self.record(&segments);
        }
    }
}

/// Expand a `use` tree into one segment list per imported leaf.
fn use_paths(tree: &syn::UseTree) -> Vec<Vec<String>> {
    let mut leaves = Vec::new();
    let mut pending = vec![(tree, Vec::new())];
    while let Some((node, mut prefix)) = pending.pop() {
        match node {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                pending.push((&path.tree, prefix));
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                leaves.push(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                leaves.push(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                leaves.push(prefix);
            }
            syn::UseTree::Group(group) => {
                pending.extend(group.items.iter().map(|item| (item, prefix.clone())));
            }
        }
    }
    leaves
}

/// Read every `.rs` file under the layer directories of `src_dir`, sorted by
/// path so reports are stable.
fn read_layer_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut pending: Vec<PathBuf> = Layer::ALL
        .iter()
        .map(|layer| src_dir.join(layer.rules().name))
        .filter(|dir| dir.is_dir())
        .collect();
    let mut sources = Vec::new();

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension() == Some(OsStr::new("rs")) {
                let file = path
                    .strip_prefix(src_dir)
                    .map_err(|err| ArchitectureLintError::parse(&path, err.to_string()))?
                    .to_path_buf();
                let contents = fs::read_to_string(&path)?;
                sources.push(LintSource { file, contents });
            }
        }
    }

    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}
