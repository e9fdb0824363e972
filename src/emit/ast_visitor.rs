//! `ast_visitor.hpp` / `ast_visitor.cpp`: the default traversal visitor.
//!
//! Every handler just recurses into the node's children, so concrete visitors can derive
//! from `AstVisitor` and override only the kinds they care about.

use astgen_grammar::Grammar;

use super::start;
use super::visitor::{handler_signature, override_declarations};
use crate::config::GeneratorConfig;

pub const HEADER: &str = "ast_visitor.hpp";
pub const SOURCE: &str = "ast_visitor.cpp";

#[tracing::instrument(skip_all)]
pub fn emit_header(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let mut w = start(HEADER, config);
    w.pragma_once();
    w.include(super::visitor::ARTIFACT);
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    w.brief("Concrete visitor for all AST classes");
    w.open("class AstVisitor : public Visitor {");
    w.access("public");
    override_declarations(&mut w, grammar, |_| true);
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
    for node in grammar.concrete() {
        w.open(&format!("{} {{", handler_signature(node, Some("AstVisitor"), "node")));
        w.line("node.visit_children(*this);");
        w.close("}");
        w.blank();
    }
    w.namespace_close(&config.visitor_namespace());
    w.finish()
}
