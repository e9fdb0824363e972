//! Grammar model and loader for the `astgen` code generator.
//!
//! This crate turns a declarative YAML description of a tree-shaped IR into a resolved
//! [`Grammar`]: an ordered list of [`Node`] kinds, each with typed [`ChildNode`] fields and
//! a [`RoleSet`] resolved from the [`Classification`] tables. It performs no file output;
//! emitters in the `astgen` crate read the resolved model.
//!
//! ## Example
//!
//! ```
//! use astgen_grammar::{Classification, LoadOptions, load_str};
//!
//! let source = r#"
//! - Stmt:
//!     children:
//!       - Return:
//!           members:
//!             - value: { type: Expr }
//! - Expr:
//! "#;
//! let grammar = load_str(source, &Classification::default(), &LoadOptions::default()).unwrap();
//! assert_eq!(grammar.len(), 3);
//! assert!(grammar.get("Stmt").unwrap().is_abstract);
//! ```

pub mod entry;
pub mod errors;
pub mod grammar;
pub mod loader;
pub mod model;
pub mod naming;
pub mod roles;

pub use errors::{GrammarError, GrammarResult};
pub use grammar::Grammar;
pub use loader::{LoadOptions, load_documents, load_str};
pub use model::{Affix, Cardinality, ChildNode, DataType, Getter, Node, Ownership};
pub use naming::{escape_cpp_string, to_snake_case, to_upper_snake_case};
pub use roles::{Classification, Role, RoleSet};
