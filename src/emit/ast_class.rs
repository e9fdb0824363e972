//! `ast.hpp`: the root class and one class body per kind.
//!
//! Classes are written bases-before-derived ([`Grammar::in_dependency_order`]), so the
//! artifact compiles whatever order the grammar declared its kinds in. Method bodies that
//! need other kinds' definitions (traversal, dispatch, copying) live in `ast.cpp`.

use astgen_grammar::{ChildNode, Grammar, Node};

use super::writer::CodeWriter;
use super::{access, getter_type, member_type, param_type, quoted, start, vector_alias};
use crate::config::GeneratorConfig;

pub const ARTIFACT: &str = "ast.hpp";

#[tracing::instrument(skip_all, fields(kinds = grammar.len()))]
pub fn emit(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let mut w = start(ARTIFACT, config);
    w.pragma_once();
    for header in ["memory", "stdexcept", "string", "vector"] {
        w.include_system(header);
    }
    w.blank();
    w.include("ast_decl.hpp");
    for header in &config.runtime.ast_headers {
        w.include(header);
    }
    w.blank();

    w.namespace_open(&config.ast_namespace());
    root_class(&mut w, grammar, config);
    for node in grammar.in_dependency_order() {
        class(&mut w, node, config);
    }
    w.namespace_close(&config.ast_namespace());
    w.finish()
}

fn root_class(w: &mut CodeWriter, grammar: &Grammar, config: &GeneratorConfig) {
    let root = grammar.root_class();
    let token = &config.token_type;

    w.brief("Base class of every node kind");
    w.open(&format!("struct {root} {{"));
    w.access("private");
    w.brief("owning node, null for a detached tree");
    w.line(&format!("{root}* parent = nullptr;"));
    w.blank();
    w.access("public");
    w.line(&format!("{root}() = default;"));
    // Copies start detached; the new owner links them.
    w.line(&format!("{root}(const {root}& /*obj*/) noexcept {{}}"));
    w.line(&format!("{root}& operator=(const {root}& /*obj*/) noexcept {{"));
    w.line("    return *this;");
    w.line("}");
    w.line(&format!("virtual ~{root}() = default;"));
    w.blank();
    w.line("virtual AstNodeType get_node_type() const noexcept = 0;");
    w.line("virtual std::string get_node_type_name() const = 0;");
    w.line("virtual std::string get_nmodl_name() const {");
    w.line("    return \"\";");
    w.line("}");
    w.line("virtual std::string get_node_name() const {");
    w.line("    throw std::logic_error(\"get_node_name not implemented\");");
    w.line("}");
    w.line(&format!("virtual {root}* clone() const = 0;"));
    w.blank();
    w.line("virtual void visit_children(visitor::Visitor& v) = 0;");
    w.line("virtual void accept(visitor::Visitor& v) = 0;");
    w.blank();
    w.line(&format!("virtual {token}* get_token() const {{"));
    w.line("    return nullptr;");
    w.line("}");
    w.line("virtual symtab::SymbolTable* get_symbol_table() const {");
    w.line("    return nullptr;");
    w.line("}");
    w.line("virtual void set_symbol_table(symtab::SymbolTable* /*table*/) {}");
    w.line("virtual void set_name(const std::string& /*name*/) {");
    w.line("    throw std::logic_error(\"set_name not implemented\");");
    w.line("}");
    w.line("virtual void negate() {");
    w.line("    throw std::logic_error(\"negate not implemented\");");
    w.line("}");
    w.line("virtual double to_double() const {");
    w.line("    throw std::logic_error(\"to_double not implemented\");");
    w.line("}");
    for child in grammar.override_getters() {
        let getter = child.getter_name();
        w.line(&format!("virtual {} {getter}() const {{", getter_type(child)));
        w.line(&format!("    throw std::logic_error({});", quoted(&format!("{getter} not implemented"))));
        w.line("}");
    }
    w.blank();
    w.line(&format!("virtual {root}* get_parent() const noexcept {{"));
    w.line("    return parent;");
    w.line("}");
    w.line(&format!("virtual void set_parent({root}* p) noexcept {{"));
    w.line("    parent = p;");
    w.line("}");
    w.blank();
    for node in grammar.nodes() {
        w.line(&format!("virtual bool is_{}() const noexcept {{", node.snake_name()));
        w.line("    return false;");
        w.line("}");
    }
    w.close("};");
    w.blank();
}

fn class(w: &mut CodeWriter, node: &Node, config: &GeneratorConfig) {
    let name = &node.class_name;

    if let Some(brief) = &node.brief {
        w.line(&format!("/// \\brief {}", brief.trim()));
    }
    if let Some(description) = &node.description {
        if node.brief.is_some() {
            w.line("///");
        }
        for l in description.trim().lines() {
            w.line(format!("/// {l}").trim_end());
        }
    }
    w.open(&format!("class {name} : public {} {{", node.base_class));

    members(w, node, config);

    w.access("public");
    constructors(w, node);
    w.line(&format!("bool is_{}() const noexcept override {{", node.snake_name()));
    w.line("    return true;");
    w.line("}");
    w.blank();
    if node.is_abstract {
        w.line(&format!("{name}* clone() const override = 0;"));
    } else {
        w.line(&format!("{name}* clone() const override {{"));
        w.line(&format!("    return new {name}(*this);"));
        w.line("}");
    }
    w.blank();
    getters(w, node, config);
    setters(w, node, config);
    w.line("void visit_children(visitor::Visitor& v) override;");
    if !node.is_abstract {
        w.line("void accept(visitor::Visitor& v) override;");
    }
    literal_methods(w, node);

    w.close("};");
    w.blank();
}

fn members(w: &mut CodeWriter, node: &Node, config: &GeneratorConfig) {
    let has_private = node.private_children().next().is_some()
        || node.has_token
        || node.is_symtab_needed()
        || node.is_program();
    if has_private {
        w.access("private");
        for child in node.private_children() {
            member(w, child);
        }
        if node.has_token {
            w.brief("token with location information");
            w.line(&format!("std::shared_ptr<{}> token;", config.token_type));
        }
        if node.is_symtab_needed() {
            w.brief("symbol table for a block");
            w.line("symtab::SymbolTable* symtab = nullptr;");
        }
        if node.is_program() {
            w.brief("global symbol table for model");
            w.line("symtab::ModelSymbolTable model_symtab;");
        }
        w.blank();
    }

    if node.public_children().next().is_some() {
        w.access("public");
        for child in node.public_children() {
            member(w, child);
        }
        w.blank();
    }
}

fn member(w: &mut CodeWriter, child: &ChildNode) {
    if let Some(brief) = &child.brief {
        w.brief(brief);
    }
    w.line(&format!("{} {};", member_type(child), child.varname));
}

fn constructors(w: &mut CodeWriter, node: &Node) {
    let name = &node.class_name;
    let mut any = false;

    if node.has_children() {
        let params: Vec<String> = node
            .children
            .iter()
            .map(|c| format!("{} {}", param_type(c), c.varname))
            .collect();
        w.line(&format!("explicit {name}({});", params.join(", ")));
        any = true;
    }
    if node.requires_default_constructor() {
        w.line(&format!("{name}() = default;"));
        any = true;
    }
    if !node.is_abstract && node.has_children() {
        w.line(&format!("{name}(const {name}& obj);"));
        any = true;
    }
    if any {
        w.line(&format!("~{name}() override = default;"));
        w.blank();
    }
}

fn getters(w: &mut CodeWriter, node: &Node, config: &GeneratorConfig) {
    let name = &node.class_name;

    w.line("AstNodeType get_node_type() const noexcept override {");
    w.line(&format!("    return AstNodeType::{};", node.enum_name()));
    w.line("}");
    w.line("std::string get_node_type_name() const override {");
    w.line(&format!("    return {};", quoted(name)));
    w.line("}");
    if let Some(keyword) = &node.keyword {
        w.line("std::string get_nmodl_name() const override {");
        w.line(&format!("    return {};", quoted(keyword)));
        w.line("}");
    }
    if node.node_name_child().is_some() {
        w.line("std::string get_node_name() const override;");
    }
    if node.has_token {
        w.line(&format!("{}* get_token() const override {{", config.token_type));
        w.line("    return token.get();");
        w.line("}");
    }
    if node.is_symtab_needed() {
        w.line("symtab::SymbolTable* get_symbol_table() const override {");
        w.line("    return symtab;");
        w.line("}");
    }
    if node.is_program() {
        w.line("symtab::ModelSymbolTable* get_model_symbol_table() {");
        w.line("    return &model_symtab;");
        w.line("}");
    }

    for child in &node.children {
        let getter = child.getter_name();
        let over = if child.getter.is_override { " override" } else { "" };
        w.line(&format!("{} {getter}() const noexcept{over} {{", getter_type(child)));
        w.line(&format!("    return {};", child.varname));
        w.line("}");
        if child.is_embedded() {
            w.line(&format!("{}& {getter}() noexcept {{", member_type(child)));
            w.line(&format!("    return {};", child.varname));
            w.line("}");
        }
    }
    w.blank();
}

fn setters(w: &mut CodeWriter, node: &Node, config: &GeneratorConfig) {
    let mut any = false;

    if node.is_name_node() {
        if let Some(value) = node.child("value").filter(|c| c.is_node()) {
            w.line("void set_name(const std::string& name) override {");
            w.line(&format!("    value{}set(name);", access(value)));
            w.line("}");
            any = true;
        }
    }
    if node.has_token {
        w.line(&format!("void set_token(const {}& tok);", config.token_type));
        any = true;
    }
    if node.is_symtab_needed() {
        w.line("void set_symbol_table(symtab::SymbolTable* table) override {");
        w.line("    symtab = table;");
        w.line("}");
        any = true;
    }

    for child in &node.children {
        w.line(&format!("void {}({});", child.setter_name(), setter_param(child)));
        any = true;
        if child.add_method {
            add_method_declarations(w, child);
        }
    }
    if any {
        w.blank();
    }
}

/// Parameter list of a field's setter.
pub(crate) fn setter_param(child: &ChildNode) -> String {
    if child.is_vector() || child.is_owned() {
        format!("{}&& {}", member_type(child), child.varname)
    } else {
        format!("{} {}", param_type(child), child.varname)
    }
}

fn add_method_declarations(w: &mut CodeWriter, child: &ChildNode) {
    let ty = &child.type_name;
    let snake = child.type_snake_name();
    let iter = format!("{}::const_iterator", vector_alias(ty));

    w.line(&format!("void emplace_back_{snake}({ty}* n);"));
    w.line(&format!("void emplace_back_{snake}(std::unique_ptr<{ty}> n);"));
    w.line(&format!("{iter} erase_{snake}({iter} first);"));
    w.line(&format!("{iter} erase_{snake}({iter} first, {iter} last);"));
    w.line(&format!("{iter} insert_{snake}({iter} position, std::unique_ptr<{ty}> n);"));
    w.line(&format!("void reset_{snake}({iter} position, std::unique_ptr<{ty}> n);"));
}

/// `eval`/`set`/`negate` for kinds wrapping a literal value.
fn literal_methods(w: &mut CodeWriter, node: &Node) {
    let Some(data_type) = &node.data_type else {
        return;
    };
    let ty = &data_type.cpp_type;
    w.blank();

    if data_type.is_enum {
        w.line("std::string eval() const {");
        w.line(&format!("    return {ty}Names[value];"));
        w.line("}");
        return;
    }

    let returned = if data_type.is_integral { ty.clone() } else { format!("const {ty}&") };
    w.line(&format!("{returned} eval() const {{"));
    w.line("    return value;");
    w.line("}");
    let param = if data_type.is_integral { format!("{ty} v") } else { format!("const {ty}& v") };
    w.line(&format!("void set({param}) {{"));
    w.line("    value = v;");
    w.line("}");

    if !node.is_negatable() {
        return;
    }
    // Literals kept as source text (e.g. doubles) negate by toggling the leading sign.
    if ty == "std::string" {
        w.line("void negate() override {");
        w.line("    value = (!value.empty() && value[0] == '-') ? value.substr(1) : \"-\" + value;");
        w.line("}");
        w.line("double to_double() const override {");
        w.line("    return std::stod(value);");
        w.line("}");
    } else {
        w.line("void negate() override {");
        w.line(&format!("    value = {}value;", node.negation_operator()));
        w.line("}");
        w.line("double to_double() const override {");
        w.line("    return value;");
        w.line("}");
    }
}
