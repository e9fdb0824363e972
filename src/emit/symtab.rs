//! `symtab_visitor.hpp` / `symtab_visitor.cpp`: symbol-table construction visitor.
//!
//! Only kinds that contribute to symbol tables get a handler; everything else falls back
//! to `AstVisitor` traversal. The four setup helpers are declared here and defined by the
//! runtime, next to the symbol-table types themselves.

use astgen_grammar::{Grammar, Node};

use super::start;
use super::visitor::{handler_signature, override_declarations};
use crate::config::GeneratorConfig;

pub const HEADER: &str = "symtab_visitor.hpp";
pub const SOURCE: &str = "symtab_visitor.cpp";

/// Statement performing the symbol-table work for `node`.
///
/// A kind can sit in several tables; the first match wins: symbol variable, program,
/// global block, helper, then any other scoped or symbol block.
pub(crate) fn setup_call(node: &Node) -> String {
    if node.is_symbol_var() {
        "setup_symbol(&node);".to_string()
    } else if node.is_program() {
        "setup_program_symbol_table(&node);".to_string()
    } else if node.is_global_block() {
        "setup_symbol_table(&node, node.get_node_type_name(), true);".to_string()
    } else if node.is_symbol_helper() {
        "setup_symbol_helper(&node);".to_string()
    } else {
        let name = if node.node_name_child().is_some() {
            "node.get_node_name()"
        } else {
            "node.get_node_type_name()"
        };
        format!("setup_symbol_table(&node, {name}, false);")
    }
}

#[tracing::instrument(skip_all)]
pub fn emit_header(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let root = grammar.root_class();

    let mut w = start(HEADER, config);
    w.pragma_once();
    w.include_system("string");
    w.blank();
    w.include(super::ast_visitor::HEADER);
    for header in &config.runtime.ast_headers {
        w.include(header);
    }
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    w.brief("Concrete visitor for constructing symbol table from AST");
    w.open("class SymtabVisitor : public AstVisitor {");
    w.access("private");
    w.line("symtab::ModelSymbolTable* modsymtab = nullptr;");
    w.line("bool update = false;");
    w.blank();
    w.line(&format!("void setup_symbol(ast::{root}* node);"));
    w.line(&format!("void setup_program_symbol_table(ast::{root}* node);"));
    w.line(&format!(
        "void setup_symbol_table(ast::{root}* node, const std::string& name, bool is_global);"
    ));
    w.line(&format!("void setup_symbol_helper(ast::{root}* node);"));
    w.blank();
    w.access("public");
    w.line("explicit SymtabVisitor(bool update = false)");
    w.line("    : update(update) {}");
    w.line("explicit SymtabVisitor(symtab::ModelSymbolTable* symtab, bool update = false)");
    w.line("    : modsymtab(symtab)");
    w.line("    , update(update) {}");
    w.blank();
    override_declarations(&mut w, grammar, Node::is_symtab_method_required);
    w.close("};");
    w.blank();
    w.namespace_close(&config.visitor_namespace());
    w.finish()
}

#[tracing::instrument(skip_all)]
pub fn emit_source(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let mut w = start(SOURCE, config);
    w.include(HEADER);
    w.include(super::ast_class::ARTIFACT);
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    for node in grammar.concrete().filter(|n| n.is_symtab_method_required()) {
        w.open(&format!("{} {{", handler_signature(node, Some("SymtabVisitor"), "node")));
        w.line(&setup_call(node));
        w.close("}");
        w.blank();
    }
    w.namespace_close(&config.visitor_namespace());
    w.finish()
}
