//! `json_visitor.hpp` / `json_visitor.cpp`: serialization visitor.
//!
//! Each node opens a block named after its kind, serializes its children, and for literal
//! kinds appends the literal value unless the kind's macro field is set.

use astgen_grammar::{Grammar, Node};

use super::visitor::{handler_signature, override_declarations};
use super::writer::CodeWriter;
use super::{quoted, start};
use crate::config::GeneratorConfig;

pub const HEADER: &str = "json_visitor.hpp";
pub const SOURCE: &str = "json_visitor.cpp";

#[tracing::instrument(skip_all)]
pub fn emit_header(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let printer = &config.runtime.json_printer_type;

    let mut w = start(HEADER, config);
    w.pragma_once();
    for header in ["memory", "ostream", "string"] {
        w.include_system(header);
    }
    w.blank();
    w.include(super::ast_visitor::HEADER);
    w.include(&config.runtime.json_printer_header);
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    w.brief("Visitor for printing AST in JSON format");
    w.open("class JSONVisitor : public AstVisitor {");
    w.access("private");
    w.line(&format!("std::unique_ptr<{printer}> printer;"));
    w.blank();
    w.access("public");
    w.line("JSONVisitor()");
    w.line(&format!("    : printer(std::make_unique<{printer}>()) {{}}"));
    w.line("explicit JSONVisitor(std::ostream& stream)");
    w.line(&format!("    : printer(std::make_unique<{printer}>(stream)) {{}}"));
    w.line("explicit JSONVisitor(const std::string& filename)");
    w.line(&format!("    : printer(std::make_unique<{printer}>(filename)) {{}}"));
    w.blank();
    w.line("void flush() {");
    w.line("    printer->flush();");
    w.line("}");
    w.blank();
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
    w.blank();
    w.include_system("sstream");
    w.blank();
    w.include(super::ast_class::ARTIFACT);
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    for node in grammar.concrete() {
        handler(&mut w, node);
    }
    w.namespace_close(&config.visitor_namespace());
    w.finish()
}

fn handler(w: &mut CodeWriter, node: &Node) {
    w.open(&format!("{} {{", handler_signature(node, Some("JSONVisitor"), "node")));
    if !node.has_children() {
        w.line("(void)node;");
        w.line(&format!("printer->add_node({});", quoted(&node.class_name)));
        w.close("}");
        w.blank();
        return;
    }

    w.line("printer->push_block(node.get_node_type_name());");
    w.line("node.visit_children(*this);");
    if node.is_data_type() {
        let guard = node
            .macro_field
            .as_deref()
            .and_then(|field| node.child(field))
            .map(|child| child.getter_name());
        if let Some(getter) = &guard {
            w.open(&format!("if (!node.{getter}()) {{"));
        }
        w.line("std::stringstream ss;");
        w.line("ss << node.eval();");
        w.line("printer->add_node(ss.str());");
        if guard.is_some() {
            w.close("}");
        }
    }
    w.line("printer->pop_block();");
    w.close("}");
    w.blank();
}
