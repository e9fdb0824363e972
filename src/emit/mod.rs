//! C++ emitters
//!
//! Every emitter is a pure function of the resolved [`Grammar`] and the
//! [`GeneratorConfig`], returning the full text of one artifact. None of them reads
//! another emitter's output; cross-artifact consistency comes from all of them deriving
//! names (`visit_<kind>`, `AstNodeType::<KIND>`, `get_<field>`) from the same model through
//! the helpers below.
//!
//! ## Modules
//!
//! - `writer` - indentation-aware text writer
//! - `ast_decl`, `ast_class`, `ast_def` - node forward declarations, class bodies, definitions
//! - `visitor`, `ast_visitor`, `json`, `symtab`, `text` - visitor framework
//! - `artifacts` - artifact registry and the `generate` driver

pub mod artifacts;
pub mod ast_class;
pub mod ast_decl;
pub mod ast_def;
pub mod ast_visitor;
pub mod json;
pub mod symtab;
pub mod text;
pub mod visitor;
pub mod writer;

use astgen_grammar::{ChildNode, Node, Ownership, escape_cpp_string};

use crate::config::GeneratorConfig;
use writer::CodeWriter;

/// Writer configured for `config`, with the artifact banner already written.
pub(crate) fn start(artifact: &str, config: &GeneratorConfig) -> CodeWriter {
    let mut w = CodeWriter::new(config.indent_width);
    w.file_header(artifact, &config.header_comment);
    w
}

/// Name of the visitor handler for `node`.
pub fn handler_name(node: &Node) -> String {
    format!("visit_{}", node.snake_name())
}

/// Double-quoted C++ string literal.
pub(crate) fn quoted(text: &str) -> String {
    format!("\"{}\"", escape_cpp_string(text))
}

pub(crate) fn vector_alias(type_name: &str) -> String {
    format!("{type_name}Vector")
}

/// Storage type of a field inside its parent.
pub(crate) fn member_type(child: &ChildNode) -> String {
    if child.is_vector() {
        return vector_alias(&child.type_name);
    }
    match child.ownership {
        Ownership::Value | Ownership::Embedded => child.type_name.clone(),
        Ownership::Owned => format!("std::unique_ptr<{}>", child.type_name),
    }
}

/// Constructor parameter type. Owning handles are taken by value and moved in.
pub(crate) fn param_type(child: &ChildNode) -> String {
    if child.is_vector() || child.is_owned() || child.is_integral {
        member_type(child)
    } else {
        format!("const {}&", member_type(child))
    }
}

/// Whether a constructor parameter must be moved into its member.
pub(crate) fn is_moved(child: &ChildNode) -> bool {
    child.is_vector() || child.is_owned()
}

/// Return type of the const getter.
pub(crate) fn getter_type(child: &ChildNode) -> String {
    if child.is_integral {
        member_type(child)
    } else {
        format!("const {}&", member_type(child))
    }
}

/// Member access operator for a scalar node field.
pub(crate) fn access(child: &ChildNode) -> &'static str {
    if child.is_embedded() { "." } else { "->" }
}

/// Expression rendering a field's value as `std::string`, given the expression that reads it.
pub(crate) fn string_expr(child: &ChildNode, read: &str) -> String {
    match child.ownership {
        Ownership::Value if child.is_enum => format!("{}Names[{read}]", child.type_name),
        Ownership::Value if child.type_name == "std::string" => read.to_string(),
        Ownership::Value => format!("std::to_string({read})"),
        Ownership::Embedded => format!("{read}.eval()"),
        Ownership::Owned => format!("{read}->eval()"),
    }
}

/// Expression reading a field's numeric value.
pub(crate) fn numeric_expr(child: &ChildNode, read: &str) -> String {
    match child.ownership {
        Ownership::Value => read.to_string(),
        Ownership::Embedded => format!("{read}.eval()"),
        Ownership::Owned => format!("{read}->eval()"),
    }
}
