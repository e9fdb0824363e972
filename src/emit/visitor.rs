//! `visitor.hpp`: the abstract visitor interface, one pure handler per concrete kind.

use astgen_grammar::{Grammar, Node};

use super::writer::CodeWriter;
use super::{handler_name, start};
use crate::config::GeneratorConfig;

pub const ARTIFACT: &str = "visitor.hpp";

/// `void visit_<kind>(ast::<Kind>& node)`, optionally qualified with the visitor class.
pub(crate) fn handler_signature(node: &Node, class: Option<&str>, param: &str) -> String {
    let qualifier = class.map(|c| format!("{c}::")).unwrap_or_default();
    format!(
        "void {qualifier}{}(ast::{}& {param})",
        handler_name(node),
        node.class_name
    )
}

/// Declare one overriding handler per concrete kind accepted by `include`.
pub(crate) fn override_declarations(w: &mut CodeWriter, grammar: &Grammar, include: impl Fn(&Node) -> bool) {
    for node in grammar.concrete().filter(|n| include(*n)) {
        w.line(&format!("{} override;", handler_signature(node, None, "node")));
    }
}

#[tracing::instrument(skip_all, fields(kinds = grammar.len()))]
pub fn emit(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let mut w = start(ARTIFACT, config);
    w.pragma_once();
    w.include(super::ast_decl::ARTIFACT);
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    w.brief("Abstract base class for all visitors");
    w.open("class Visitor {");
    w.access("public");
    w.line("virtual ~Visitor() = default;");
    w.blank();
    for node in grammar.concrete() {
        w.line(&format!("virtual {} = 0;", handler_signature(node, None, "node")));
    }
    w.close("};");
    w.blank();
    w.namespace_close(&config.visitor_namespace());
    w.finish()
}
