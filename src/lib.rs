#![forbid(unsafe_code)]
//! Grammar-driven AST and visitor code generator
//!
//! `astgen` reads a YAML description of a tree-shaped IR (node kinds, their fields and
//! printing hints) plus a classification of kinds into roles, and emits a complete C++
//! implementation of it: node classes, an abstract visitor and four concrete visitors
//! (traversal, JSON serialization, symbol-table construction, text printing).
//!
//! The grammar model and loader live in the `astgen_grammar` crate; this crate holds the
//! emitters, the configuration and the command line.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Example
//!
//! ```
//! use astgen::{GeneratorConfig, emit};
//! use astgen_grammar::load_str;
//!
//! let config = GeneratorConfig::default();
//! let grammar = load_str("- Expr:\n", &config.classification, &config.load_options()).unwrap();
//! let visitor = emit::visitor::emit(&grammar, &config);
//! assert!(visitor.contains("virtual void visit_expr(ast::Expr& node) = 0;"));
//! ```

pub mod cli;
pub mod config;
pub mod emit;
pub mod errors;

pub use config::{GeneratorConfig, RuntimeConfig, TextConfig};
pub use emit::artifacts::{ARTIFACTS, Artifact, GenerateReport, generate, render_all};
pub use errors::{GenerateError, GenerateResult};
