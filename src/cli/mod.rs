//! CLI module for the astgen code generator
//!
//! ## Commands
//!
//! - `generate -g <grammar>...` - Render every artifact into an output directory
//! - `check -g <grammar>...` - Load and validate the grammar, print a summary
//! - `dump -g <grammar>...` - Print the resolved grammar model as JSON
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::GenerateError> for CliError {
    /// Render the diagnostic (code, help, source chain) through miette.
    fn from(err: crate::errors::GenerateError) -> Self {
        CliError::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate C++ AST classes and visitors from a YAML grammar
#[derive(Parser, Debug)]
#[command(name = "astgen")]
#[command(version = VERSION)]
#[command(about = "Generate C++ AST classes and visitors from a YAML grammar", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Grammar and configuration inputs shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Grammar document; repeat to overlay further documents in order
    #[arg(short = 'g', long = "grammar", value_name = "FILE", required = true)]
    pub grammars: Vec<PathBuf>,

    /// Generator configuration (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render every artifact into an output directory
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Output directory
        #[arg(short = 'o', long = "output", value_name = "DIR", default_value = "generated")]
        output: PathBuf,
        /// Only render the named artifact (repeatable)
        #[arg(long = "only", value_name = "ARTIFACT")]
        only: Vec<String>,
    },

    /// Load and validate the grammar, then print a summary
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the resolved grammar model as JSON
    Dump {
        #[command(flatten)]
        input: InputArgs,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Default log filter for a `-v` count.
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize structured logging. `RUST_LOG` takes precedence over `-v`.
pub fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(verbosity))),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate { input, output, only } => commands::generate(&input, &output, &only),
        Command::Check { input } => commands::check(&input),
        Command::Dump { input } => commands::dump(&input),
    }
}

// ============================================================================
// Tests
// ============================================================================
