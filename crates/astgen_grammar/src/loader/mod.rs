//! Grammar loader: declarative documents → resolved [`Grammar`].
//!
//! Loading happens in three steps:
//!
//! 1. **Parse** each document into the grammar AST ([`crate::entry`]).
//! 2. **Flatten** the entries with a single recursive walk. A group contributes its own
//!    abstract kind first and then its descendants depth-first, so a base always precedes
//!    the kinds that derive from it. Top-level entries derive from the root class.
//! 3. **Resolve** member types, ownership and classification roles, validating every
//!    classification table entry against the declared kinds.
//!
//! When several documents are loaded together (a base grammar plus overlays), a kind that
//! an earlier document already declared is skipped with a warning; the children of a
//! skipped group are still visited, so an overlay can extend an existing group. Turning an
//! earlier concrete kind into a group is an error.
//!
//! Every name must be a C++ identifier, and no two kinds may share an enum tag.

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

use crate::entry::{Entry, EntryInfo, MemberSpec, parse_document};
use crate::errors::{GrammarError, GrammarResult};
use crate::grammar::Grammar;
use crate::model::{Cardinality, ChildNode, DataType, Node, Ownership};
use crate::naming::is_cpp_identifier;
use crate::roles::{Classification, Role, RoleSet};

/// Getters the generated root class already declares with fixed signatures.
const ROOT_GETTERS: &[&str] = &[
    "get_node_type",
    "get_node_type_name",
    "get_nmodl_name",
    "get_node_name",
    "get_token",
    "get_symbol_table",
    "get_parent",
];

/// Type-system settings the loader needs to classify member types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Class every top-level kind derives from.
    pub root_class: String,
    /// Primitive types stored by value.
    pub value_types: Vec<String>,
    /// Value types passed and returned by value instead of by const reference.
    pub integral_types: Vec<String>,
    /// Value types that are enums with a `<Type>Names` display table.
    pub enum_types: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            root_class: "Ast".to_string(),
            value_types: ["std::string", "int", "float", "double", "short", "bool"]
                .map(String::from)
                .to_vec(),
            integral_types: ["int", "float", "double", "short", "bool"].map(String::from).to_vec(),
            enum_types: Vec::new(),
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_class(mut self, root_class: impl Into<String>) -> Self {
        self.root_class = root_class.into();
        self
    }

    pub fn with_value_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_integral_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.integral_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_enum_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_types = types.into_iter().map(Into::into).collect();
        self
    }

    fn is_value_type(&self, name: &str) -> bool {
        self.value_types.iter().chain(&self.enum_types).any(|t| t == name)
    }

    fn is_integral(&self, name: &str) -> bool {
        self.integral_types.iter().chain(&self.enum_types).any(|t| t == name)
    }

    fn is_enum(&self, name: &str) -> bool {
        self.enum_types.iter().any(|t| t == name)
    }
}

/// Load a single grammar document.
pub fn load_str(source: &str, classification: &Classification, options: &LoadOptions) -> GrammarResult<Grammar> {
    load_documents(&[("grammar", source)], classification, options)
}

/// Load a base grammar followed by any number of overlay documents.
///
/// Each element is `(document name, YAML source)`; the name only appears in diagnostics.
#[tracing::instrument(skip_all, fields(documents = documents.len()))]
pub fn load_documents(
    documents: &[(&str, &str)],
    classification: &Classification,
    options: &LoadOptions,
) -> GrammarResult<Grammar> {
    let parsed = documents
        .iter()
        .map(|(name, source)| parse_document(name, source).map(|entries| (*name, entries)))
        .collect::<GrammarResult<Vec<_>>>()?;

    let mut flattener = Flattener::new(&options.root_class);
    for (name, entries) in &parsed {
        flattener.document(name, entries)?;
    }

    let pending = flattener.finish();
    tracing::debug!(kinds = pending.len(), "flattened grammar");

    let grammar = Resolver::new(&pending, classification, options)?.resolve()?;
    tracing::debug!(
        kinds = grammar.len(),
        concrete = grammar.concrete().count(),
        "resolved grammar"
    );
    Ok(grammar)
}

/// A kind after flattening, before member types are resolved.
#[derive(Debug, Clone)]
struct PendingNode<'a> {
    class_name: &'a str,
    base_class: String,
    is_abstract: bool,
    info: &'a EntryInfo,
    members: &'a [MemberSpec],
}

struct Flattener<'a> {
    root_class: &'a str,
    nodes: Vec<PendingNode<'a>>,
    /// Declared kinds and whether each is abstract.
    seen: HashMap<String, bool>,
}

impl<'a> Flattener<'a> {
    fn new(root_class: &'a str) -> Self {
        Self {
            root_class,
            nodes: Vec::new(),
            seen: HashMap::new(),
        }
    }

    fn document(&mut self, document: &str, entries: &'a [Entry]) -> GrammarResult<()> {
        let mut local: HashSet<&str> = HashSet::new();
        let root = self.root_class.to_string();
        self.walk(document, entries, &root, &mut local)
    }

    fn walk(
        &mut self,
        document: &str,
        entries: &'a [Entry],
        base_class: &str,
        local: &mut HashSet<&'a str>,
    ) -> GrammarResult<()> {
        for entry in entries {
            let name = entry.name();
            if !is_cpp_identifier(name) {
                return Err(GrammarError::InvalidIdentifier {
                    entry: name.to_string(),
                    name: name.to_string(),
                });
            }
            if name == self.root_class {
                return Err(GrammarError::RootCollision { entry: name.to_string() });
            }
            if !local.insert(name) {
                return Err(GrammarError::DuplicateKind { entry: name.to_string() });
            }

            let (is_abstract, members, children): (bool, &'a [MemberSpec], &'a [Entry]) = match entry {
                Entry::Group { children, .. } => (true, &[], children),
                Entry::Leaf { members, .. } => (false, members, &[]),
            };

            match self.seen.get(name).copied() {
                None => {
                    self.seen.insert(name.to_string(), is_abstract);
                    self.nodes.push(PendingNode {
                        class_name: name,
                        base_class: base_class.to_string(),
                        is_abstract,
                        info: entry.info(),
                        members,
                    });
                }
                Some(was_abstract) if is_abstract && !was_abstract => {
                    return Err(GrammarError::GroupOverKind { entry: name.to_string() });
                }
                Some(_) => {
                    tracing::warn!(kind = name, document, "kind already declared by an earlier document, skipping");
                }
            }

            self.walk(document, children, name, local)?;
        }
        Ok(())
    }

    fn finish(self) -> Vec<PendingNode<'a>> {
        self.nodes
    }
}

struct Resolver<'p, 'a> {
    pending: &'p [PendingNode<'a>],
    classification: &'p Classification,
    options: &'p LoadOptions,
    roles: HashMap<&'a str, RoleSet>,
}

impl<'p, 'a> Resolver<'p, 'a> {
    fn new(
        pending: &'p [PendingNode<'a>],
        classification: &'p Classification,
        options: &'p LoadOptions,
    ) -> GrammarResult<Self> {
        let roles: HashMap<&'a str, RoleSet> = pending
            .iter()
            .map(|p| (p.class_name, classification.roles_for(p.class_name, &p.base_class)))
            .collect();

        for (table, kind) in classification.references() {
            if !roles.contains_key(kind) {
                return Err(GrammarError::UnknownClassifiedKind {
                    table,
                    entry: kind.to_string(),
                });
            }
        }

        Ok(Self {
            pending,
            classification,
            options,
            roles,
        })
    }

    fn resolve(&self) -> GrammarResult<Grammar> {
        let nodes = self
            .pending
            .iter()
            .map(|p| self.node(p))
            .collect::<GrammarResult<Vec<_>>>()?;

        check_tags(&nodes)?;
        check_overrides(&nodes)?;

        for node in &nodes {
            if node.is_negatable() && !node.is_abstract && node.data_type.is_none() {
                tracing::warn!(
                    kind = node.class_name.as_str(),
                    "numeric literal kind has no entry in `data_types`; it will not expose eval()"
                );
            }
        }

        Ok(Grammar::new(self.options.root_class.clone(), nodes))
    }

    fn node(&self, pending: &PendingNode<'a>) -> GrammarResult<Node> {
        let entry = pending.class_name;
        let children = pending
            .members
            .iter()
            .map(|m| self.child(entry, m))
            .collect::<GrammarResult<Vec<_>>>()?;

        if children.iter().filter(|c| c.node_name).count() > 1 {
            return Err(GrammarError::MultipleNodeNames { entry: entry.to_string() });
        }

        let data_type = match self.classification.data_types.get(entry) {
            Some(type_name) => {
                if !self.options.is_value_type(type_name) {
                    return Err(GrammarError::UnknownValueType {
                        entry: entry.to_string(),
                        type_name: type_name.clone(),
                    });
                }
                if !children.iter().any(|c| c.varname == "value") {
                    return Err(GrammarError::MissingValueMember { entry: entry.to_string() });
                }
                Some(DataType {
                    cpp_type: type_name.clone(),
                    is_enum: self.options.is_enum(type_name),
                    is_integral: self.options.is_integral(type_name),
                })
            }
            None => None,
        };

        let macro_field = match self.classification.macro_values.get(entry) {
            Some(member) => match children.iter().find(|c| &c.varname == member) {
                Some(c) if c.is_optional() => Some(member.clone()),
                _ => {
                    return Err(GrammarError::InvalidMacroField {
                        entry: entry.to_string(),
                        member: member.clone(),
                    });
                }
            },
            None => None,
        };

        let info = pending.info;
        Ok(Node {
            class_name: entry.to_string(),
            base_class: pending.base_class.clone(),
            is_abstract: pending.is_abstract,
            has_token: info.has_token,
            brief: info.brief.clone(),
            description: info.description.clone(),
            keyword: info.keyword.clone(),
            prefix: info.prefix.clone(),
            suffix: info.suffix.clone(),
            children,
            roles: self.roles.get(entry).copied().unwrap_or_default(),
            data_type,
            macro_field,
        })
    }

    fn child(&self, entry: &str, member: &MemberSpec) -> GrammarResult<ChildNode> {
        let type_name = member.type_name.as_str();

        if !is_cpp_identifier(&member.name) {
            return Err(GrammarError::InvalidIdentifier {
                entry: entry.to_string(),
                name: member.name.clone(),
            });
        }
        if member.vector && member.optional {
            return Err(GrammarError::OptionalVector {
                entry: entry.to_string(),
                member: member.name.clone(),
            });
        }

        let cardinality = if member.vector {
            Cardinality::Vector
        } else if member.optional {
            Cardinality::Optional
        } else {
            Cardinality::Scalar
        };

        if member.add && cardinality != Cardinality::Vector {
            return Err(GrammarError::AddOnScalar {
                entry: entry.to_string(),
                member: member.name.clone(),
            });
        }

        let (ownership, type_roles) = if let Some(&roles) = self.roles.get(type_name) {
            let embedded = roles.contains(Role::ValueKind) && cardinality == Cardinality::Scalar;
            (if embedded { Ownership::Embedded } else { Ownership::Owned }, roles)
        } else if self.options.is_value_type(type_name) {
            if cardinality == Cardinality::Vector {
                return Err(GrammarError::ValueVector {
                    entry: entry.to_string(),
                    member: member.name.clone(),
                    type_name: type_name.to_string(),
                });
            }
            if cardinality == Cardinality::Optional {
                return Err(GrammarError::OptionalValue {
                    entry: entry.to_string(),
                    member: member.name.clone(),
                    type_name: type_name.to_string(),
                });
            }
            (Ownership::Value, RoleSet::EMPTY)
        } else {
            return Err(GrammarError::UnknownType {
                entry: entry.to_string(),
                member: member.name.clone(),
                type_name: type_name.to_string(),
            });
        };

        let is_value = ownership == Ownership::Value;
        Ok(ChildNode {
            varname: member.name.clone(),
            type_name: type_name.to_string(),
            cardinality,
            ownership,
            is_integral: is_value && self.options.is_integral(type_name),
            is_enum: is_value && self.options.is_enum(type_name),
            type_roles,
            is_public: member.public,
            add_method: member.add,
            node_name: member.node_name,
            getter: member.getter.clone(),
            separator: member.separator.clone(),
            prefix: member.prefix.clone(),
            suffix: member.suffix.clone(),
            brief: member.brief.clone(),
        })
    }
}

/// Distinct kinds must not collapse onto the same enum tag (and so the same handler name).
fn check_tags(nodes: &[Node]) -> GrammarResult<()> {
    let mut tags: HashMap<String, &str> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        let tag = node.enum_name();
        if let Some(other) = tags.get(&tag) {
            return Err(GrammarError::TagCollision {
                entry: node.class_name.clone(),
                other: other.to_string(),
                tag,
            });
        }
        tags.insert(tag, &node.class_name);
    }
    Ok(())
}

/// Overriding getters become virtuals on the root class, so every declaration of one name
/// must return the same member shape.
fn check_overrides(nodes: &[Node]) -> GrammarResult<()> {
    let mut declared: HashMap<String, &ChildNode> = HashMap::new();
    for node in nodes {
        for child in node.children.iter().filter(|c| c.getter.is_override) {
            let getter = child.getter_name();
            let conflict = ROOT_GETTERS.contains(&getter.as_str())
                || declared.get(&getter).is_some_and(|earlier| {
                    earlier.type_name != child.type_name
                        || earlier.cardinality != child.cardinality
                        || earlier.ownership != child.ownership
                });
            if conflict {
                return Err(GrammarError::ConflictingOverride {
                    entry: node.class_name.clone(),
                    getter,
                });
            }
            declared.entry(getter).or_insert(child);
        }
    }
    Ok(())
}
