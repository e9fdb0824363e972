//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use astgen_grammar::{Grammar, load_documents};

use super::{CliError, CliResult, ExitCode, InputArgs};
use crate::config::GeneratorConfig;
use crate::emit::artifacts;
use crate::errors::{GenerateError, GenerateResult};

// ============================================================================
// Input loading (shared by every command)
// ============================================================================

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> GenerateResult<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_file(path),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Read and merge grammar documents, in order.
pub fn load_grammar(paths: &[PathBuf], config: &GeneratorConfig) -> GenerateResult<Grammar> {
    let mut sources: Vec<(String, String)> = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.clone(),
            source,
        })?;
        sources.push((path.display().to_string(), source));
    }

    let documents: Vec<(&str, &str)> = sources
        .iter()
        .map(|(name, source)| (name.as_str(), source.as_str()))
        .collect();
    let grammar = load_documents(&documents, &config.classification, &config.load_options())?;
    Ok(grammar)
}

fn load_inputs(input: &InputArgs) -> GenerateResult<(Grammar, GeneratorConfig)> {
    let config = load_config(input.config.as_deref())?;
    let grammar = load_grammar(&input.grammars, &config)?;
    Ok((grammar, config))
}

// ============================================================================
// Commands
// ============================================================================

/// Render the artifacts into `output`.
pub fn generate(input: &InputArgs, output: &Path, only: &[String]) -> CliResult<ExitCode> {
    let (grammar, config) = load_inputs(input)?;
    let report = artifacts::generate(&grammar, &config, output, only)?;

    println!(
        "updated {}/{} artifacts in {}",
        report.written.len(),
        report.total(),
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// One-line summary of a loaded grammar.
pub fn summary(grammar: &Grammar, documents: usize) -> String {
    let concrete = grammar.concrete().count();
    format!(
        "{} kinds ({} concrete, {} abstract) from {} document{}",
        grammar.len(),
        concrete,
        grammar.len() - concrete,
        documents,
        if documents == 1 { "" } else { "s" }
    )
}

/// Load and validate the grammar without writing anything.
pub fn check(input: &InputArgs) -> CliResult<ExitCode> {
    let (grammar, _) = load_inputs(input)?;
    println!("{}", summary(&grammar, input.grammars.len()));
    Ok(ExitCode::SUCCESS)
}

/// Print the resolved model as pretty JSON.
pub fn dump(input: &InputArgs) -> CliResult<ExitCode> {
    let (grammar, _) = load_inputs(input)?;
    let json = serde_json::to_string_pretty(&grammar)
        .map_err(|e| CliError::failure(format!("Error serializing grammar: {}", e)))?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}
