//! Artifact registry and the generation driver.
//!
//! Rendering is all-or-nothing: every selected artifact is rendered in memory before the
//! first file is touched, so a failing render never leaves a half-updated output
//! directory. Files whose content is already up to date are left alone, which keeps
//! their timestamps stable for incremental C++ builds.

use std::fs;
use std::path::{Path, PathBuf};

use astgen_grammar::Grammar;
use serde::Serialize;

use super::{ast_class, ast_decl, ast_def, ast_visitor, json, symtab, text, visitor};
use crate::config::GeneratorConfig;
use crate::errors::{GenerateError, GenerateResult};

/// Renders one artifact from the grammar and configuration.
pub type RenderFn = fn(&Grammar, &GeneratorConfig) -> String;

/// A generated file.
#[derive(Debug, Clone, Copy)]
pub struct Artifact {
    /// File name inside the output directory.
    pub name: &'static str,
    pub render: RenderFn,
}

/// Every artifact, in generation order.
pub const ARTIFACTS: &[Artifact] = &[
    Artifact { name: ast_decl::ARTIFACT, render: ast_decl::emit },
    Artifact { name: ast_class::ARTIFACT, render: ast_class::emit },
    Artifact { name: ast_def::ARTIFACT, render: ast_def::emit },
    Artifact { name: visitor::ARTIFACT, render: visitor::emit },
    Artifact { name: ast_visitor::HEADER, render: ast_visitor::emit_header },
    Artifact { name: ast_visitor::SOURCE, render: ast_visitor::emit_source },
    Artifact { name: json::HEADER, render: json::emit_header },
    Artifact { name: json::SOURCE, render: json::emit_source },
    Artifact { name: symtab::HEADER, render: symtab::emit_header },
    Artifact { name: symtab::SOURCE, render: symtab::emit_source },
    Artifact { name: text::HEADER, render: text::emit_header },
    Artifact { name: text::SOURCE, render: text::emit_source },
];

/// Look up an artifact by file name.
pub fn find(name: &str) -> Option<&'static Artifact> {
    ARTIFACTS.iter().find(|a| a.name == name)
}

fn known_names() -> String {
    ARTIFACTS.iter().map(|a| a.name).collect::<Vec<_>>().join(", ")
}

/// Resolve `only` to artifacts; an empty selection means all of them.
pub fn select(only: &[String]) -> GenerateResult<Vec<&'static Artifact>> {
    if only.is_empty() {
        return Ok(ARTIFACTS.iter().collect());
    }
    let mut selected: Vec<&'static Artifact> = Vec::with_capacity(only.len());
    for name in only {
        let artifact = find(name).ok_or_else(|| GenerateError::UnknownArtifact {
            name: name.clone(),
            known: known_names(),
        })?;
        if !selected.iter().any(|a| a.name == artifact.name) {
            selected.push(artifact);
        }
    }
    Ok(selected)
}

/// Render every artifact in memory.
pub fn render_all(grammar: &Grammar, config: &GeneratorConfig) -> Vec<(&'static str, String)> {
    ARTIFACTS
        .iter()
        .map(|a| (a.name, (a.render)(grammar, config)))
        .collect()
}

/// Outcome of a [`generate`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    /// Files created or rewritten.
    pub written: Vec<PathBuf>,
    /// Files whose content was already current.
    pub unchanged: Vec<PathBuf>,
}

impl GenerateReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

/// Render the selected artifacts and write them into `out_dir`.
#[tracing::instrument(skip(grammar, config), fields(kinds = grammar.len()))]
pub fn generate(
    grammar: &Grammar,
    config: &GeneratorConfig,
    out_dir: &Path,
    only: &[String],
) -> GenerateResult<GenerateReport> {
    let selected = select(only)?;
    let rendered: Vec<(PathBuf, String)> = selected
        .iter()
        .map(|a| (out_dir.join(a.name), (a.render)(grammar, config)))
        .collect();

    fs::create_dir_all(out_dir).map_err(|source| GenerateError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut report = GenerateReport::default();
    for (path, content) in rendered {
        if is_current(&path, &content) {
            tracing::debug!(path = %path.display(), "unchanged");
            report.unchanged.push(path);
            continue;
        }
        fs::write(&path, &content).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "written");
        report.written.push(path);
    }

    if report.written.is_empty() {
        tracing::info!("nothing to do, {} artifacts up to date", report.total());
    } else {
        tracing::info!("updated {}/{} artifacts", report.written.len(), report.total());
    }
    Ok(report)
}

fn is_current(path: &Path, content: &str) -> bool {
    fs::read_to_string(path).is_ok_and(|existing| existing == content)
}
