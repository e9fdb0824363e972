//! Classification roles attached to grammar kinds.
//!
//! A grammar is accompanied by a [`Classification`]: a set of named tables listing which
//! kinds play which part in the generated code (the program root, block-scoped kinds,
//! symbol-table contributors, literal value types, ...). Instead of letting every emitter
//! probe those tables by name, the loader resolves them once into a [`RoleSet`] stored on
//! each [`crate::Node`] and rejects any table entry that names an undeclared kind.
//!
//! ## Notes
//! - Tables are deserialized with `deny_unknown_fields`, so a misspelled table name is a
//!   configuration error rather than a silently empty table.
//! - Map-valued tables (`data_types`, `macro_values`) use `BTreeMap` so iteration order is
//!   stable across runs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A part a kind can play in the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The program-root kind; owns the model-wide symbol table.
    Program,
    /// Derives directly from the `base_block` kind; carries a symbol-table back-reference.
    BlockScoped,
    /// The statement-block kind; always null-guarded when traversed or printed.
    StatementBlock,
    /// Derives from the `number` kind; exposes `negate()`.
    Negatable,
    /// Boolean literal kind; negation flips truthiness.
    Boolean,
    /// String literal kind.
    StringKind,
    /// Name kind; exposes `set_name()`.
    NameKind,
    /// Printed as a statement.
    Statement,
    /// Printed as an indented block.
    Block,
    /// Block-scoped kind opening the program-wide table.
    GlobalBlock,
    /// Registers a single symbol.
    SymbolVar,
    /// Opens a named, non-global scoped table.
    SymbolBlock,
    /// Needs the per-kind symbol registration helper.
    SymbolHelper,
    /// Produced directly by the lexer; requires a default constructor.
    LexerDataType,
    /// Held by value instead of through an owning pointer.
    ValueKind,
    /// Wraps a single literal `value`.
    DataType,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: &'static [Role] = &[
        Role::Program,
        Role::BlockScoped,
        Role::StatementBlock,
        Role::Negatable,
        Role::Boolean,
        Role::StringKind,
        Role::NameKind,
        Role::Statement,
        Role::Block,
        Role::GlobalBlock,
        Role::SymbolVar,
        Role::SymbolBlock,
        Role::SymbolHelper,
        Role::LexerDataType,
        Role::ValueKind,
        Role::DataType,
    ];

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Compact set of [`Role`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u32);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the contained roles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.iter().copied().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        let mut set = RoleSet::EMPTY;
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl Serialize for RoleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Classification tables, as authored in the generator configuration.
///
/// Single-kind tables hold one kind name; list tables hold any number. Every name is
/// checked against the declared kinds when the grammar is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Classification {
    pub program: Option<String>,
    pub base_block: Option<String>,
    pub statement_block: Option<String>,
    pub number: Option<String>,
    pub boolean: Option<String>,
    pub string: Option<String>,
    pub name: Option<String>,
    pub statements: Vec<String>,
    pub blocks: Vec<String>,
    pub global_blocks: Vec<String>,
    pub symbol_vars: Vec<String>,
    pub symbol_blocks: Vec<String>,
    pub symbol_helpers: Vec<String>,
    pub lexer_data_types: Vec<String>,
    pub value_kinds: Vec<String>,
    /// Kind → stored C++ value type (`Integer: int`).
    pub data_types: BTreeMap<String, String>,
    /// Kind → optional member whose presence suppresses the serialized literal value.
    pub macro_values: BTreeMap<String, String>,
}

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(table, kind)` reference in the classification, in a stable order.
    pub fn references(&self) -> Vec<(&'static str, &str)> {
        let mut refs: Vec<(&'static str, &str)> = Vec::new();

        let singles = [
            ("program", &self.program),
            ("base_block", &self.base_block),
            ("statement_block", &self.statement_block),
            ("number", &self.number),
            ("boolean", &self.boolean),
            ("string", &self.string),
            ("name", &self.name),
        ];
        for (table, kind) in singles {
            if let Some(kind) = kind {
                refs.push((table, kind.as_str()));
            }
        }

        let lists = [
            ("statements", &self.statements),
            ("blocks", &self.blocks),
            ("global_blocks", &self.global_blocks),
            ("symbol_vars", &self.symbol_vars),
            ("symbol_blocks", &self.symbol_blocks),
            ("symbol_helpers", &self.symbol_helpers),
            ("lexer_data_types", &self.lexer_data_types),
            ("value_kinds", &self.value_kinds),
        ];
        for (table, kinds) in lists {
            refs.extend(kinds.iter().map(|k| (table, k.as_str())));
        }

        refs.extend(self.data_types.keys().map(|k| ("data_types", k.as_str())));
        refs.extend(self.macro_values.keys().map(|k| ("macro_values", k.as_str())));
        refs
    }

    /// Resolve the roles of one kind from its name and base class.
    pub fn roles_for(&self, class_name: &str, base_class: &str) -> RoleSet {
        let is = |slot: &Option<String>| slot.as_deref() == Some(class_name);
        let derives = |slot: &Option<String>| slot.as_deref() == Some(base_class);
        let listed = |list: &Vec<String>| list.iter().any(|k| k == class_name);

        let mut roles = RoleSet::EMPTY;
        let checks = [
            (Role::Program, is(&self.program)),
            (Role::BlockScoped, derives(&self.base_block)),
            (Role::StatementBlock, is(&self.statement_block)),
            (Role::Negatable, derives(&self.number)),
            (Role::Boolean, is(&self.boolean)),
            (Role::StringKind, is(&self.string)),
            (Role::NameKind, is(&self.name)),
            (Role::Statement, listed(&self.statements)),
            (Role::Block, listed(&self.blocks)),
            (Role::GlobalBlock, listed(&self.global_blocks)),
            (Role::SymbolVar, listed(&self.symbol_vars)),
            (Role::SymbolBlock, listed(&self.symbol_blocks)),
            (Role::SymbolHelper, listed(&self.symbol_helpers)),
            (Role::LexerDataType, listed(&self.lexer_data_types)),
            (Role::ValueKind, listed(&self.value_kinds)),
            (Role::DataType, self.data_types.contains_key(class_name)),
        ];
        for (role, applies) in checks {
            if applies {
                roles.insert(role);
            }
        }
        roles
    }
}
