//! `text_visitor.hpp` / `text_visitor.cpp`: prints a tree back as source text.
//!
//! A handler prints, in order: the kind's keyword, its prefix, each field wrapped in the
//! field's affixes, and its suffix. Block kinds raise the printer's indentation level
//! around their fields. Forced affixes are printed whether or not the field is present;
//! unforced ones only inside the field's presence guard.
//!
//! Two fields are special-cased through [`crate::config::TextConfig`]: the operator field
//! (printed with surrounding spaces for some operators) and the repeat field (an integer
//! printed as a run of a literal, e.g. the order of a primed name).

use astgen_grammar::{ChildNode, Grammar, Node};

use super::visitor::{handler_signature, override_declarations};
use super::writer::CodeWriter;
use super::{numeric_expr, quoted, start, string_expr};
use crate::config::{GeneratorConfig, TextConfig};

pub const HEADER: &str = "text_visitor.hpp";
pub const SOURCE: &str = "text_visitor.cpp";

#[tracing::instrument(skip_all)]
pub fn emit_header(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let printer = &config.runtime.text_printer_type;

    let mut w = start(HEADER, config);
    w.pragma_once();
    for header in ["memory", "ostream", "string", "vector"] {
        w.include_system(header);
    }
    w.blank();
    w.include(super::visitor::ARTIFACT);
    w.include(&config.runtime.text_printer_header);
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    w.brief("Visitor for printing AST back to source text");
    w.open("class TextPrintVisitor : public Visitor {");
    w.access("private");
    w.line(&format!("std::unique_ptr<{printer}> printer;"));
    w.blank();
    w.line("template <typename T>");
    w.line("void visit_element(const std::vector<T>& elements,");
    w.line("                   const std::string& separator,");
    w.line("                   bool program,");
    w.line("                   bool statement);");
    w.blank();
    w.access("public");
    w.line("TextPrintVisitor()");
    w.line(&format!("    : printer(std::make_unique<{printer}>()) {{}}"));
    w.line("explicit TextPrintVisitor(std::ostream& stream)");
    w.line(&format!("    : printer(std::make_unique<{printer}>(stream)) {{}}"));
    w.line("explicit TextPrintVisitor(const std::string& filename)");
    w.line(&format!("    : printer(std::make_unique<{printer}>(filename)) {{}}"));
    w.blank();
    override_declarations(&mut w, grammar, |_| true);
    w.close("};");
    w.blank();
    w.namespace_close(&config.visitor_namespace());
    w.blank();
    w.include(&config.runtime.text_helper_header);
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
        handler(&mut w, node, &config.text);
    }
    w.namespace_close(&config.visitor_namespace());
    w.finish()
}

fn handler(w: &mut CodeWriter, node: &Node, text: &TextConfig) {
    let param = if node.has_children() { "node" } else { "/*node*/" };
    let signature = handler_signature(node, Some("TextPrintVisitor"), param);

    w.begin_buffer();
    w.indent();
    if let Some(keyword) = &node.keyword {
        add_element(w, keyword);
    }
    if let Some(prefix) = &node.prefix {
        add_element(w, prefix);
    }
    if node.renders_as_block() {
        w.line("printer->push_level();");
    }
    for child in &node.children {
        field(w, node, child, text);
    }
    if let Some(suffix) = &node.suffix {
        add_element(w, suffix);
    }
    if node.renders_as_block() {
        w.line("printer->pop_level();");
    }
    w.dedent();
    let body = w.end_buffer();

    if body.is_empty() {
        w.line(&format!("{signature} {{}}"));
    } else {
        w.line(&format!("{signature} {{"));
        w.write_raw(&body);
        w.line("}");
    }
    w.blank();
}

fn add_element(w: &mut CodeWriter, text: &str) {
    w.line(&format!("printer->add_element({});", quoted(text)));
}

fn field(w: &mut CodeWriter, node: &Node, child: &ChildNode, text: &TextConfig) {
    let read = format!("node.{}()", child.getter_name());
    let has_unforced = child.unforced_prefix().is_some() || child.unforced_suffix().is_some();

    if let Some(prefix) = child.forced_prefix() {
        add_element(w, prefix);
    }

    let guard = if child.requires_guard() {
        Some(format!("if ({read}) {{"))
    } else if child.is_vector() && has_unforced {
        Some(format!("if (!{read}.empty()) {{"))
    } else {
        None
    };
    if let Some(guard) = &guard {
        w.open(guard);
    }

    if let Some(prefix) = child.unforced_prefix() {
        add_element(w, prefix);
    }
    field_body(w, node, child, text, &read);
    if let Some(suffix) = child.unforced_suffix() {
        add_element(w, suffix);
    }

    if guard.is_some() {
        w.close("}");
    }

    if let Some(suffix) = child.forced_suffix() {
        add_element(w, suffix);
    }
}

fn field_body(w: &mut CodeWriter, node: &Node, child: &ChildNode, text: &TextConfig, read: &str) {
    if child.is_vector() {
        let separator = child.separator.as_deref().unwrap_or("");
        w.line(&format!(
            "visit_element({read}, {}, {}, {});",
            quoted(separator),
            node.is_program(),
            child.is_statement_type()
        ));
    } else if child.varname == text.operator_field {
        let spaced: Vec<String> = text
            .spaced_operators
            .iter()
            .map(|op| format!("op == {}", quoted(op)))
            .collect();
        w.line(&format!("std::string op = {};", string_expr(child, read)));
        if !spaced.is_empty() {
            w.open(&format!("if ({}) {{", spaced.join(" || ")));
            w.line("op = \" \" + op + \" \";");
            w.close("}");
        }
        w.line("printer->add_element(op);");
    } else if child.varname == text.repeat_field {
        w.open(&format!("for (int i = 0; i < {}; i++) {{", numeric_expr(child, read)));
        add_element(w, &text.repeat_text);
        w.close("}");
    } else if child.is_embedded() {
        w.line(&format!("{read}.accept(*this);"));
    } else if child.is_node() {
        w.line(&format!("{read}->accept(*this);"));
    } else {
        w.line(&format!("printer->add_element({});", string_expr(child, read)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::test_support::{full, statements};

    fn handler_text<'a>(text: &'a str, kind: &str) -> &'a str {
        let needle = format!("void TextPrintVisitor::visit_{kind}(");
        let start = text.find(&needle).unwrap();
        let end = start + text[start..].find("\n\n").unwrap();
        &text[start..end]
    }

    #[test]
    fn test_if_prints_forced_and_guarded_affixes() {
        let (grammar, config) = statements();
        let text = emit_source(&grammar, &config);
        insta::assert_snapshot!(handler_text(&text, "if"), @r#"
        void TextPrintVisitor::visit_if(ast::If& node) {
            printer->add_element("if (");
            node.get_cond()->accept(*this);
            printer->add_element(") ");
            node.get_then_branch()->accept(*this);
            if (node.get_else_branch()) {
                printer->add_element(" else ");
                node.get_else_branch()->accept(*this);
            }
        }
        "#);
    }

    #[test]
    fn test_keyword_and_childless_kinds() {
        let (grammar, config) = statements();
        let text = emit_source(&grammar, &config);
        assert_eq!(
            handler_text(&text, "return"),
            "void TextPrintVisitor::visit_return(ast::Return& node) {\n    printer->add_element(\"return \");\n    node.get_value()->accept(*this);\n}"
        );
        assert_eq!(
            handler_text(&text, "expr"),
            "void TextPrintVisitor::visit_expr(ast::Expr& /*node*/) {}"
        );
    }

    #[test]
    fn test_block_kinds_change_level() {
        let (grammar, config) = full();
        let text = emit_source(&grammar, &config);
        let procedure = handler_text(&text, "procedure");
        assert!(procedure.contains("    printer->add_element(\"PROCEDURE \");\n    printer->push_level();"));
        assert!(procedure.contains("    if (node.get_body()) {\n        node.get_body()->accept(*this);\n    }"));
        assert!(procedure.ends_with("    printer->pop_level();\n}"));

        let block = handler_text(&text, "statement_block");
        assert!(block.contains("visit_element(node.get_statements(), \"\", false, true);"));
        assert!(block.contains("printer->add_element(\"{\");"));
    }

    #[test]
    fn test_vector_separator_and_program_flag() {
        let (grammar, config) = full();
        let text = emit_source(&grammar, &config);
        assert!(handler_text(&text, "local_list").contains("visit_element(node.get_variables(), \", \", false, false);"));
        assert!(handler_text(&text, "program").contains("visit_element(node.get_blocks(), \"\", true, false);"));
    }

    #[test]
    fn test_operator_and_repeat_fields() {
        let (grammar, config) = full();
        let text = emit_source(&grammar, &config);
        let binary = handler_text(&text, "binary_expression");
        assert!(binary.contains("    std::string op = node.get_op().eval();"));
        assert!(binary.contains("    if (op == \"=\" || op == \"&&\" || op == \"||\" || op == \"==\") {"));
        assert!(binary.contains("    printer->add_element(op);"));

        let prime = handler_text(&text, "prime_name");
        assert!(prime.contains("    for (int i = 0; i < node.get_order()->eval(); i++) {\n        printer->add_element(\"'\");\n    }"));
    }

    #[test]
    fn test_literal_values_printed_as_strings() {
        let (grammar, config) = full();
        let text = emit_source(&grammar, &config);
        assert!(handler_text(&text, "integer").contains("printer->add_element(std::to_string(node.get_value()));"));
        assert!(handler_text(&text, "string").contains("printer->add_element(node.get_value());"));
        assert!(handler_text(&text, "binary_operator").contains("printer->add_element(BinaryOpNames[node.get_value()]);"));
        assert!(handler_text(&text, "integer").contains("    if (node.get_macro()) {\n        node.get_macro()->accept(*this);\n    }"));
    }

    #[test]
    fn test_unforced_vector_affix_guarded_by_emptiness() {
        let source = r#"
- Call:
    members:
      - args:
          type: Arg
          vector: true
          separator: ", "
          prefix: "("
          suffix: ")"
- Arg:
"#;
        let (grammar, config) = crate::emit::test_support::grammar(source, Default::default());
        let text = emit_source(&grammar, &config);
        assert!(handler_text(&text, "call").contains(
            "    if (!node.get_args().empty()) {\n        printer->add_element(\"(\");\n        visit_element(node.get_args(), \", \", false, false);\n        printer->add_element(\")\");\n    }"
        ));
    }

    #[test]
    fn test_header_includes_helper_after_namespace() {
        let (grammar, config) = statements();
        let text = emit_header(&grammar, &config);
        assert!(text.ends_with("}  // namespace lang::visitor\n\n#include \"visitors/nmodl_visitor_helper.ipp\"\n"));
        assert!(text.contains("std::unique_ptr<printer::NMODLPrinter> printer;"));
    }
}
