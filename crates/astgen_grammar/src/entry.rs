//! Grammar AST for the declarative input format.
//!
//! A grammar document is a YAML sequence of single-key mappings. The key names a kind and
//! the value describes it:
//!
//! ```yaml
//! - Stmt:
//!     brief: "statement"
//!     children:
//!       - Return:
//!           members:
//!             - value:
//!                 type: Expr
//!       - If:
//!           members:
//!             - cond: { type: Expr }
//!             - else_branch: { type: Stmt, optional: true }
//! - Expr:
//! ```
//!
//! An entry with `children` is a [`Entry::Group`] (an abstract kind introducing further
//! kinds); anything else is an [`Entry::Leaf`]. The distinction is structural and decided
//! here, once, rather than by matching names after the fact.

use serde::Deserialize;
use serde_yaml::Value;

use crate::errors::{GrammarError, GrammarResult};
use crate::model::{Affix, Getter};

/// Descriptor fields shared by groups and leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInfo {
    pub brief: Option<String>,
    pub description: Option<String>,
    pub keyword: Option<String>,
    pub has_token: bool,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

/// One field declaration of a leaf entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSpec {
    pub name: String,
    pub type_name: String,
    pub optional: bool,
    pub vector: bool,
    pub add: bool,
    pub separator: Option<String>,
    pub public: bool,
    pub prefix: Option<Affix>,
    pub suffix: Option<Affix>,
    pub getter: Getter,
    pub node_name: bool,
    pub brief: Option<String>,
}

/// A parsed grammar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Group {
        name: String,
        info: EntryInfo,
        children: Vec<Entry>,
    },
    Leaf {
        name: String,
        info: EntryInfo,
        members: Vec<MemberSpec>,
    },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Group { name, .. } | Entry::Leaf { name, .. } => name,
        }
    }

    pub fn info(&self) -> &EntryInfo {
        match self {
            Entry::Group { info, .. } | Entry::Leaf { info, .. } => info,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Entry::Group { .. })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawEntry {
    brief: Option<String>,
    description: Option<String>,
    #[serde(alias = "nmodl")]
    keyword: Option<String>,
    token: bool,
    prefix: Option<RawAffix>,
    suffix: Option<RawAffix>,
    /// Accepted for documentation links; not used by any emitter.
    #[allow(dead_code)]
    url: Option<String>,
    members: Option<Vec<Value>>,
    children: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawAffix {
    Text(String),
    Full(RawAffixSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAffixSpec {
    value: String,
    #[serde(default)]
    force: bool,
}

impl From<RawAffix> for Affix {
    fn from(raw: RawAffix) -> Self {
        match raw {
            RawAffix::Text(value) => Affix::new(value, false),
            RawAffix::Full(spec) => Affix::new(spec.value, spec.force),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawGetter {
    name: Option<String>,
    #[serde(rename = "override")]
    is_override: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawMember {
    #[serde(rename = "type")]
    type_name: Option<String>,
    optional: bool,
    vector: bool,
    add: bool,
    separator: Option<String>,
    public: bool,
    prefix: Option<RawAffix>,
    suffix: Option<RawAffix>,
    getter: Option<RawGetter>,
    node_name: bool,
    brief: Option<String>,
}

/// Parse one grammar document into its top-level entries.
pub fn parse_document(document: &str, source: &str) -> GrammarResult<Vec<Entry>> {
    let value: Value = serde_yaml::from_str(source).map_err(|e| GrammarError::Syntax {
        document: document.to_string(),
        message: e.to_string(),
    })?;

    match value {
        // An empty file declares nothing.
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => parse_entries(&items),
        _ => Err(GrammarError::NotASequence {
            document: document.to_string(),
        }),
    }
}

fn parse_entries(items: &[Value]) -> GrammarResult<Vec<Entry>> {
    items.iter().enumerate().map(|(i, item)| parse_entry(i, item)).collect()
}

/// Split a `{ name: body }` mapping into its key and body.
fn single_key(position: usize, item: &Value) -> Result<(String, Value), String> {
    let Value::Mapping(map) = item else {
        return Err(format!("item #{} is not a mapping", position + 1));
    };
    if map.len() != 1 {
        return Err(format!("item #{} must have exactly one key, found {}", position + 1, map.len()));
    }
    match map.iter().next() {
        Some((Value::String(name), body)) => Ok((name.clone(), body.clone())),
        _ => Err(format!("item #{} key must be a string", position + 1)),
    }
}

fn parse_entry(position: usize, item: &Value) -> GrammarResult<Entry> {
    let (name, body) = single_key(position, item).map_err(|message| GrammarError::MalformedEntry {
        entry: format!("#{}", position + 1),
        message,
    })?;

    let raw: RawEntry = match body {
        Value::Null => RawEntry::default(),
        body => serde_yaml::from_value(body).map_err(|e| GrammarError::MalformedEntry {
            entry: name.clone(),
            message: e.to_string(),
        })?,
    };

    let info = EntryInfo {
        brief: raw.brief,
        description: raw.description,
        keyword: raw.keyword,
        has_token: raw.token,
        prefix: raw.prefix.map(|a| Affix::from(a).value),
        suffix: raw.suffix.map(|a| Affix::from(a).value),
    };

    match (raw.members, raw.children) {
        (Some(_), Some(_)) => Err(GrammarError::BothMembersAndChildren { entry: name }),
        (None, Some(children)) => {
            let children = match children {
                Value::Sequence(items) => parse_entries(&items)?,
                _ => {
                    return Err(GrammarError::MalformedEntry {
                        entry: name,
                        message: "`children` must be a sequence of entries".to_string(),
                    });
                }
            };
            if children.is_empty() {
                return Err(GrammarError::EmptyGroup { entry: name });
            }
            Ok(Entry::Group { name, info, children })
        }
        (members, None) => {
            let members = members
                .unwrap_or_default()
                .iter()
                .enumerate()
                .map(|(i, m)| parse_member(&name, i, m))
                .collect::<GrammarResult<Vec<_>>>()?;
            Ok(Entry::Leaf { name, info, members })
        }
    }
}

fn parse_member(entry: &str, position: usize, item: &Value) -> GrammarResult<MemberSpec> {
    let (member, body) = single_key(position, item).map_err(|message| GrammarError::MalformedMember {
        entry: entry.to_string(),
        member: format!("#{}", position + 1),
        message,
    })?;

    let raw: RawMember = match body {
        Value::Null => RawMember::default(),
        body => serde_yaml::from_value(body).map_err(|e| GrammarError::MalformedMember {
            entry: entry.to_string(),
            member: member.clone(),
            message: e.to_string(),
        })?,
    };

    let Some(type_name) = raw.type_name else {
        return Err(GrammarError::MissingType {
            entry: entry.to_string(),
            member,
        });
    };

    let getter = raw
        .getter
        .map(|g| Getter {
            name: g.name,
            is_override: g.is_override,
        })
        .unwrap_or_default();

    Ok(MemberSpec {
        name: member,
        type_name,
        optional: raw.optional,
        vector: raw.vector,
        add: raw.add,
        separator: raw.separator,
        public: raw.public,
        prefix: raw.prefix.map(Affix::from),
        suffix: raw.suffix.map(Affix::from),
        getter,
        node_name: raw.node_name,
        brief: raw.brief,
    })
}
