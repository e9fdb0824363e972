//! Generator configuration
//!
//! Everything that is not part of the grammar itself: target namespace, the names of the
//! runtime types generated code refers to, the value-type system, the textual visitor's
//! special-cased fields and the classification tables. Loaded from YAML; every key is
//! optional and unknown keys are rejected.

use std::fs;
use std::path::Path;

use astgen_grammar::{Classification, LoadOptions};
use serde::{Deserialize, Serialize};

use crate::errors::{GenerateError, GenerateResult};

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Enclosing C++ namespace; node classes live in `<namespace>::ast`
    pub namespace: String,
    /// Class every top-level kind derives from
    pub root_class: String,
    /// Source-position token type
    pub token_type: String,
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Banner text placed at the top of every artifact
    pub header_comment: String,
    /// Primitive types stored by value
    pub value_types: Vec<String>,
    /// Value types passed by value rather than const reference
    pub integral_types: Vec<String>,
    /// Value types that are enums with a `<Type>Names` display table
    pub enum_types: Vec<String>,
    pub runtime: RuntimeConfig,
    pub text: TextConfig,
    pub classification: Classification,
}

/// Runtime collaborators the generated code refers to but does not define
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Extra headers for `ast.hpp` (token type, symbol tables)
    pub ast_headers: Vec<String>,
    pub json_printer_header: String,
    /// Printer class used by the serialization visitor
    pub json_printer_type: String,
    pub text_printer_header: String,
    /// Printer class used by the textual visitor
    pub text_printer_type: String,
    /// Definition of the textual visitor's `visit_element` helper
    pub text_helper_header: String,
}

/// Special-cased fields of the textual visitor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Field rendered as an operator
    pub operator_field: String,
    /// Operators printed with a space on each side
    pub spaced_operators: Vec<String>,
    /// Field rendered as a run of `repeat_text` instead of a number
    pub repeat_field: String,
    pub repeat_text: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: "nmodl".to_string(),
            root_class: "Ast".to_string(),
            token_type: "ModToken".to_string(),
            indent_width: 4,
            header_comment: "Generated by astgen. Do not edit.".to_string(),
            value_types: ["std::string", "int", "float", "double", "short", "bool"]
                .map(String::from)
                .to_vec(),
            integral_types: ["int", "float", "double", "short", "bool"].map(String::from).to_vec(),
            enum_types: Vec::new(),
            runtime: RuntimeConfig::default(),
            text: TextConfig::default(),
            classification: Classification::default(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ast_headers: ["lexer/modtoken.hpp", "symtab/symbol_table.hpp"].map(String::from).to_vec(),
            json_printer_header: "printer/json_printer.hpp".to_string(),
            json_printer_type: "printer::JSONPrinter".to_string(),
            text_printer_header: "printer/nmodl_printer.hpp".to_string(),
            text_printer_type: "printer::NMODLPrinter".to_string(),
            text_helper_header: "visitors/nmodl_visitor_helper.ipp".to_string(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            operator_field: "op".to_string(),
            spaced_operators: ["=", "&&", "||", "=="].map(String::from).to_vec(),
            repeat_field: "order".to_string(),
            repeat_text: "'".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is the default configuration.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> GenerateResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| GenerateError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set the enclosing namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the root class name
    pub fn with_root_class(mut self, root_class: impl Into<String>) -> Self {
        self.root_class = root_class.into();
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the enum value types
    pub fn with_enum_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the classification tables
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Namespace of the generated node classes
    pub fn ast_namespace(&self) -> String {
        format!("{}::ast", self.namespace)
    }

    /// Namespace of the generated visitors
    pub fn visitor_namespace(&self) -> String {
        format!("{}::visitor", self.namespace)
    }

    /// Type-system settings for the grammar loader
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new()
            .with_root_class(self.root_class.clone())
            .with_value_types(self.value_types.iter().cloned())
            .with_integral_types(self.integral_types.iter().cloned())
            .with_enum_types(self.enum_types.iter().cloned())
    }
}
