//! `ast.cpp`: out-of-line member definitions.
//!
//! Everything that needs a complete visitor type or the definitions of other kinds lives
//! here: constructors, deep copies, traversal, dispatch, mutators and `get_node_name`.

use astgen_grammar::{ChildNode, Grammar, Node};

use super::ast_class::setter_param;
use super::writer::CodeWriter;
use super::{access, handler_name, is_moved, param_type, start, string_expr, vector_alias};
use crate::config::GeneratorConfig;

pub const ARTIFACT: &str = "ast.cpp";

#[tracing::instrument(skip_all, fields(kinds = grammar.len()))]
pub fn emit(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let mut w = start(ARTIFACT, config);
    for header in ["iterator", "memory", "string"] {
        w.include_system(header);
    }
    w.blank();
    w.include(super::ast_class::ARTIFACT);
    w.include(super::visitor::ARTIFACT);
    w.blank();

    w.namespace_open(&config.ast_namespace());
    for node in grammar.in_dependency_order() {
        definitions(&mut w, node, config);
    }
    w.namespace_close(&config.ast_namespace());
    w.finish()
}

fn definitions(w: &mut CodeWriter, node: &Node, config: &GeneratorConfig) {
    if !node.is_abstract {
        constructor(w, node);
        copy_constructor(w, node, config);
    }
    visit_children(w, node);
    if !node.is_abstract {
        let name = &node.class_name;
        w.open(&format!("void {name}::accept(visitor::Visitor& v) {{"));
        w.line(&format!("v.{}(*this);", handler_name(node)));
        w.close("}");
        w.blank();
    }
    node_name(w, node);
    setters(w, node, config);
}

/// Members in declaration order, which is the order initializers must follow.
fn declaration_order(node: &Node) -> impl Iterator<Item = &ChildNode> {
    node.private_children().chain(node.public_children())
}

fn constructor(w: &mut CodeWriter, node: &Node) {
    if !node.has_children() {
        return;
    }
    let name = &node.class_name;
    let params: Vec<String> = node
        .children
        .iter()
        .map(|c| format!("{} {}", param_type(c), c.varname))
        .collect();
    let inits: Vec<String> = declaration_order(node)
        .map(|c| {
            if is_moved(c) {
                format!("{0}(std::move({0}))", c.varname)
            } else {
                format!("{0}({0})", c.varname)
            }
        })
        .collect();

    w.line(&format!("{name}::{name}({})", params.join(", ")));
    w.indent();
    if node.node_children().next().is_none() {
        w.line(&format!(": {} {{}}", inits.join(", ")));
        w.dedent();
    } else {
        w.line(&format!(": {} {{", inits.join(", ")));
        for child in node.node_children() {
            link_parent(w, child);
        }
        w.close("}");
    }
    w.blank();
}

/// Point a node field (or each element of a vector field) back at `this`.
///
/// Parameters shadow members in constructors and setters, hence `this->`.
fn link_parent(w: &mut CodeWriter, child: &ChildNode) {
    let var = &child.varname;
    if child.is_vector() {
        w.open(&format!("for (auto& item : this->{var}) {{"));
        w.line("item->set_parent(this);");
        w.close("}");
    } else if child.is_owned() {
        w.open(&format!("if (this->{var}) {{"));
        w.line(&format!("this->{var}->set_parent(this);"));
        w.close("}");
    } else if child.is_embedded() {
        w.line(&format!("this->{var}.set_parent(this);"));
    }
}

fn copy_constructor(w: &mut CodeWriter, node: &Node, config: &GeneratorConfig) {
    if !node.has_children() {
        return;
    }
    let name = &node.class_name;

    w.line(&format!("{name}::{name}(const {name}& obj)"));
    w.indent();
    w.line(&format!(": {}(obj) {{", node.base_class));
    for child in &node.children {
        let var = &child.varname;
        if child.is_vector() {
            w.open(&format!("for (auto& item : obj.{var}) {{"));
            w.line(&format!("{var}.emplace_back(item->clone());"));
            w.line(&format!("{var}.back()->set_parent(this);"));
            w.close("}");
        } else if child.is_owned() {
            w.open(&format!("if (obj.{var}) {{"));
            w.line(&format!("{var}.reset(obj.{var}->clone());"));
            w.line(&format!("{var}->set_parent(this);"));
            w.close("}");
        } else {
            w.line(&format!("{var} = obj.{var};"));
            if child.is_embedded() {
                w.line(&format!("{var}.set_parent(this);"));
            }
        }
    }
    if node.has_token {
        w.open("if (obj.token) {");
        w.line(&format!(
            "token = std::shared_ptr<{0}>(obj.token->clone());",
            config.token_type
        ));
        w.close("}");
    }
    w.close("}");
    w.blank();
}

fn visit_children(w: &mut CodeWriter, node: &Node) {
    let name = &node.class_name;

    w.begin_buffer();
    w.indent();
    for child in node.node_children() {
        let var = &child.varname;
        if child.is_vector() {
            w.open(&format!("for (auto& item : {var}) {{"));
            w.line("item->accept(v);");
            w.close("}");
        } else if child.requires_guard() {
            w.open(&format!("if ({var}) {{"));
            w.line(&format!("{var}->accept(v);"));
            w.close("}");
        } else {
            w.line(&format!("{var}{}accept(v);", access(child)));
        }
    }
    w.dedent();
    let body = w.end_buffer();

    if body.is_empty() {
        w.line(&format!("void {name}::visit_children(visitor::Visitor& /*v*/) {{}}"));
    } else {
        w.line(&format!("void {name}::visit_children(visitor::Visitor& v) {{"));
        w.write_raw(&body);
        w.line("}");
    }
    w.blank();
}

fn node_name(w: &mut CodeWriter, node: &Node) {
    let Some(child) = node.node_name_child() else {
        return;
    };
    let var = &child.varname;
    let expr = if child.is_value() {
        string_expr(child, var)
    } else if child.is_string_type() {
        format!("{var}{}eval()", access(child))
    } else {
        format!("{var}{}get_node_name()", access(child))
    };

    w.open(&format!("std::string {}::get_node_name() const {{", node.class_name));
    w.line(&format!("return {expr};"));
    w.close("}");
    w.blank();
}

fn setters(w: &mut CodeWriter, node: &Node, config: &GeneratorConfig) {
    let name = &node.class_name;

    if node.has_token {
        w.open(&format!("void {name}::set_token(const {}& tok) {{", config.token_type));
        w.line(&format!("token = std::make_shared<{}>(tok);", config.token_type));
        w.close("}");
        w.blank();
    }

    for child in &node.children {
        let var = &child.varname;
        w.open(&format!("void {name}::{}({}) {{", child.setter_name(), setter_param(child)));
        if is_moved(child) {
            w.line(&format!("this->{var} = std::move({var});"));
        } else {
            w.line(&format!("this->{var} = {var};"));
        }
        link_parent(w, child);
        w.close("}");
        w.blank();

        if child.add_method {
            add_methods(w, node, child);
        }
    }
}

fn add_methods(w: &mut CodeWriter, node: &Node, child: &ChildNode) {
    let name = &node.class_name;
    let var = &child.varname;
    let ty = &child.type_name;
    let snake = child.type_snake_name();
    let iter = format!("{}::const_iterator", vector_alias(ty));

    w.open(&format!("void {name}::emplace_back_{snake}({ty}* n) {{"));
    w.line("n->set_parent(this);");
    w.line(&format!("{var}.emplace_back(n);"));
    w.close("}");
    w.blank();

    w.open(&format!("void {name}::emplace_back_{snake}(std::unique_ptr<{ty}> n) {{"));
    w.line("n->set_parent(this);");
    w.line(&format!("{var}.emplace_back(std::move(n));"));
    w.close("}");
    w.blank();

    w.open(&format!("{iter} {name}::erase_{snake}({iter} first) {{"));
    w.line(&format!("return {var}.erase(first);"));
    w.close("}");
    w.blank();

    w.open(&format!("{iter} {name}::erase_{snake}({iter} first, {iter} last) {{"));
    w.line(&format!("return {var}.erase(first, last);"));
    w.close("}");
    w.blank();

    w.open(&format!("{iter} {name}::insert_{snake}({iter} position, std::unique_ptr<{ty}> n) {{"));
    w.line("n->set_parent(this);");
    w.line(&format!("return {var}.insert(position, std::move(n));"));
    w.close("}");
    w.blank();

    w.open(&format!("void {name}::reset_{snake}({iter} position, std::unique_ptr<{ty}> n) {{"));
    w.line("n->set_parent(this);");
    w.line(&format!("{var}[std::distance({var}.cbegin(), position)] = std::move(n);"));
    w.close("}");
    w.blank();
}
