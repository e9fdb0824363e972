//! Resolved grammar model: one [`Node`] per kind, one [`ChildNode`] per field.
//!
//! These are plain value objects produced by the loader and only read afterwards. Every
//! predicate an emitter needs is a method here, answered from the kind's resolved
//! [`RoleSet`] or from its structure, so emitters never consult classification tables
//! directly.

use serde::Serialize;

use crate::naming::{to_snake_case, to_upper_snake_case};
use crate::roles::{Role, RoleSet};

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Exactly one value.
    Scalar,
    /// Ordered list of owned elements, possibly empty.
    Vector,
    /// Zero or one value.
    Optional,
}

/// How a field is stored in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// Primitive value type (`int`, `std::string`, an enum); copied, never traversed.
    Value,
    /// A kind held by value (classified `value_kinds`); copied and traversed in place.
    Embedded,
    /// A kind held through an exclusively owning pointer; deep-cloned on copy.
    Owned,
}

/// Literal text printed around a field by the textual visitor.
///
/// A forced affix is always printed; an unforced one only when the field is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Affix {
    pub value: String,
    pub force: bool,
}

impl Affix {
    pub fn new(value: impl Into<String>, force: bool) -> Self {
        Self {
            value: value.into(),
            force,
        }
    }
}

/// Accessor overrides declared on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Getter {
    /// Accessor name replacing `get_<varname>`.
    pub name: Option<String>,
    /// Whether the accessor overrides a root-class virtual.
    pub is_override: bool,
}

/// Literal value stored by a data-type kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataType {
    /// C++ type of the `value` member.
    pub cpp_type: String,
    /// Enum-backed: `eval()` maps the value through `<cpp_type>Names`.
    pub is_enum: bool,
    /// Passed and returned by value rather than by const reference.
    pub is_integral: bool,
}

/// One field of a [`Node`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildNode {
    pub varname: String,
    pub type_name: String,
    pub cardinality: Cardinality,
    pub ownership: Ownership,
    /// Value type passed by value (`int`, `double`, enums).
    pub is_integral: bool,
    /// Value type is an enum with a `<Type>Names` display table.
    pub is_enum: bool,
    /// Roles of the referenced kind; empty for value types.
    pub type_roles: RoleSet,
    pub is_public: bool,
    pub add_method: bool,
    pub node_name: bool,
    pub getter: Getter,
    pub separator: Option<String>,
    pub prefix: Option<Affix>,
    pub suffix: Option<Affix>,
    pub brief: Option<String>,
}

impl ChildNode {
    pub fn is_vector(&self) -> bool {
        self.cardinality == Cardinality::Vector
    }

    pub fn is_optional(&self) -> bool {
        self.cardinality == Cardinality::Optional
    }

    pub fn is_value(&self) -> bool {
        self.ownership == Ownership::Value
    }

    pub fn is_embedded(&self) -> bool {
        self.ownership == Ownership::Embedded
    }

    /// Held through an owning pointer (scalar or optional).
    pub fn is_owned(&self) -> bool {
        !self.is_vector() && self.ownership == Ownership::Owned
    }

    /// Field holds a grammar kind (and is therefore traversed).
    pub fn is_node(&self) -> bool {
        self.ownership != Ownership::Value
    }

    pub fn is_statement_type(&self) -> bool {
        self.type_roles.contains(Role::Statement)
    }

    pub fn is_string_type(&self) -> bool {
        self.type_roles.contains(Role::StringKind)
    }

    /// Presence must be checked before the field is dispatched.
    pub fn requires_guard(&self) -> bool {
        self.is_optional() || (self.is_owned() && self.type_roles.contains(Role::StatementBlock))
    }

    /// `snake_case` spelling of the field name.
    pub fn snake_name(&self) -> String {
        to_snake_case(&self.varname)
    }

    /// `snake_case` spelling of the field type, used in mutator names.
    pub fn type_snake_name(&self) -> String {
        to_snake_case(&self.type_name)
    }

    pub fn getter_name(&self) -> String {
        self.getter.name.clone().unwrap_or_else(|| format!("get_{}", self.snake_name()))
    }

    pub fn setter_name(&self) -> String {
        format!("set_{}", self.snake_name())
    }

    pub fn forced_prefix(&self) -> Option<&str> {
        self.prefix.as_ref().filter(|a| a.force).map(|a| a.value.as_str())
    }

    pub fn unforced_prefix(&self) -> Option<&str> {
        self.prefix.as_ref().filter(|a| !a.force).map(|a| a.value.as_str())
    }

    pub fn forced_suffix(&self) -> Option<&str> {
        self.suffix.as_ref().filter(|a| a.force).map(|a| a.value.as_str())
    }

    pub fn unforced_suffix(&self) -> Option<&str> {
        self.suffix.as_ref().filter(|a| !a.force).map(|a| a.value.as_str())
    }
}

/// One kind of the generated IR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub class_name: String,
    pub base_class: String,
    pub is_abstract: bool,
    pub has_token: bool,
    pub brief: Option<String>,
    pub description: Option<String>,
    /// Literal printed by the textual visitor before the children.
    pub keyword: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub children: Vec<ChildNode>,
    pub roles: RoleSet,
    pub data_type: Option<DataType>,
    /// Optional member whose presence suppresses the serialized literal value.
    pub macro_field: Option<String>,
}

impl Node {
    pub fn has(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Children that are traversed by `visit_children`.
    pub fn node_children(&self) -> impl Iterator<Item = &ChildNode> {
        self.children.iter().filter(|c| c.is_node())
    }

    pub fn public_children(&self) -> impl Iterator<Item = &ChildNode> {
        self.children.iter().filter(|c| c.is_public)
    }

    pub fn private_children(&self) -> impl Iterator<Item = &ChildNode> {
        self.children.iter().filter(|c| !c.is_public)
    }

    pub fn child(&self, varname: &str) -> Option<&ChildNode> {
        self.children.iter().find(|c| c.varname == varname)
    }

    /// The field marked as naming this node, if any.
    pub fn node_name_child(&self) -> Option<&ChildNode> {
        self.children.iter().find(|c| c.node_name)
    }

    pub fn snake_name(&self) -> String {
        to_snake_case(&self.class_name)
    }

    /// Enum tag spelling: `BinaryExpression` → `BINARY_EXPRESSION`.
    pub fn enum_name(&self) -> String {
        to_upper_snake_case(&self.class_name)
    }

    pub fn is_program(&self) -> bool {
        self.has(Role::Program)
    }

    pub fn is_block_scoped(&self) -> bool {
        self.has(Role::BlockScoped)
    }

    pub fn is_statement(&self) -> bool {
        self.has(Role::Statement)
    }

    pub fn is_block(&self) -> bool {
        self.has(Role::Block)
    }

    /// Printed with an indentation level of its own.
    pub fn renders_as_block(&self) -> bool {
        self.is_block() || self.is_block_scoped()
    }

    pub fn is_global_block(&self) -> bool {
        self.has(Role::GlobalBlock)
    }

    pub fn is_symbol_var(&self) -> bool {
        self.has(Role::SymbolVar)
    }

    pub fn is_symbol_block(&self) -> bool {
        self.has(Role::SymbolBlock)
    }

    pub fn is_symbol_helper(&self) -> bool {
        self.has(Role::SymbolHelper)
    }

    pub fn is_data_type(&self) -> bool {
        self.data_type.is_some()
    }

    /// Negatable numeric literal (derives from the numeric base).
    pub fn is_negatable(&self) -> bool {
        self.has(Role::Negatable)
    }

    pub fn is_boolean(&self) -> bool {
        self.has(Role::Boolean)
    }

    pub fn is_name_node(&self) -> bool {
        self.has(Role::NameKind)
    }

    pub fn is_value_kind(&self) -> bool {
        self.has(Role::ValueKind)
    }

    pub fn requires_default_constructor(&self) -> bool {
        !self.is_abstract && (self.has(Role::LexerDataType) || self.is_program() || self.is_value_kind())
    }

    /// Carries a symbol-table back-reference.
    pub fn is_symtab_needed(&self) -> bool {
        self.is_program() || self.is_block_scoped()
    }

    /// The symbol-table visitor needs a dedicated handler for this kind.
    pub fn is_symtab_method_required(&self) -> bool {
        self.has_children()
            && (self.is_symbol_var()
                || self.is_symbol_block()
                || self.is_symbol_helper()
                || self.is_program()
                || self.is_block_scoped())
    }

    /// Operator used by `negate()`.
    pub fn negation_operator(&self) -> &'static str {
        if self.is_boolean() { "!" } else { "-" }
    }
}
