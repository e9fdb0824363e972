use miette::Diagnostic;
use thiserror::Error;

/// Structural problems found while loading a grammar.
///
/// Every variant names the entry (and member, where relevant) it was raised for, so the
/// message alone is enough to locate the problem in the input document.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GrammarError {
    #[error("failed to parse grammar document `{document}`: {message}")]
    #[diagnostic(code(astgen::grammar::syntax))]
    Syntax { document: String, message: String },

    #[error("grammar document `{document}` must be a sequence of entries")]
    #[diagnostic(
        code(astgen::grammar::not_a_sequence),
        help("the top level of a grammar is a YAML list: `- Kind: {{...}}`")
    )]
    NotASequence { document: String },

    #[error("malformed entry `{entry}`: {message}")]
    #[diagnostic(
        code(astgen::grammar::malformed_entry),
        help("each entry is a single-key mapping from a kind name to its descriptor")
    )]
    MalformedEntry { entry: String, message: String },

    #[error("malformed member `{member}` of `{entry}`: {message}")]
    #[diagnostic(code(astgen::grammar::malformed_member))]
    MalformedMember {
        entry: String,
        member: String,
        message: String,
    },

    #[error("entry `{entry}` declares both `members` and `children`")]
    #[diagnostic(
        code(astgen::grammar::members_and_children),
        help("use `members` for a concrete kind and `children` for a group of kinds")
    )]
    BothMembersAndChildren { entry: String },

    #[error("member `{member}` of `{entry}` has no `type`")]
    #[diagnostic(code(astgen::grammar::missing_type))]
    MissingType { entry: String, member: String },

    #[error("kind `{entry}` is declared more than once")]
    #[diagnostic(code(astgen::grammar::duplicate_kind))]
    DuplicateKind { entry: String },

    #[error("member `{member}` of `{entry}` has unknown type `{type_name}`")]
    #[diagnostic(
        code(astgen::grammar::unknown_type),
        help("declare `{type_name}` as a kind or add it to `value_types` in the configuration")
    )]
    UnknownType {
        entry: String,
        member: String,
        type_name: String,
    },

    #[error("group `{entry}` has no children")]
    #[diagnostic(
        code(astgen::grammar::empty_group),
        help("a group must introduce at least one kind; declare `{entry}` with `members` instead")
    )]
    EmptyGroup { entry: String },

    #[error("classification table `{table}` names undeclared kind `{entry}`")]
    #[diagnostic(code(astgen::grammar::unknown_classified_kind))]
    UnknownClassifiedKind { table: &'static str, entry: String },

    #[error("data type kind `{entry}` has no `value` member")]
    #[diagnostic(
        code(astgen::grammar::missing_value_member),
        help("kinds listed under `data_types` wrap a single member named `value`")
    )]
    MissingValueMember { entry: String },

    #[error("data type `{type_name}` of kind `{entry}` is not a configured value type")]
    #[diagnostic(code(astgen::grammar::unknown_value_type))]
    UnknownValueType { entry: String, type_name: String },

    #[error("macro field `{member}` of `{entry}` must be an optional member")]
    #[diagnostic(code(astgen::grammar::invalid_macro_field))]
    InvalidMacroField { entry: String, member: String },

    #[error("member `{member}` of `{entry}` requests `add` but is not a vector")]
    #[diagnostic(code(astgen::grammar::add_on_scalar))]
    AddOnScalar { entry: String, member: String },

    #[error("member `{member}` of `{entry}` is a vector of value type `{type_name}`")]
    #[diagnostic(
        code(astgen::grammar::value_vector),
        help("vector elements must be declared kinds")
    )]
    ValueVector {
        entry: String,
        member: String,
        type_name: String,
    },

    #[error("kind `{entry}` marks more than one member as `node_name`")]
    #[diagnostic(code(astgen::grammar::multiple_node_names))]
    MultipleNodeNames { entry: String },

    #[error("kind `{entry}` collides with the root class name")]
    #[diagnostic(code(astgen::grammar::root_collision))]
    RootCollision { entry: String },

    #[error("member `{member}` of `{entry}` is an optional value of type `{type_name}`")]
    #[diagnostic(
        code(astgen::grammar::optional_value),
        help("only members of a declared kind can be absent; wrap the value in a kind")
    )]
    OptionalValue {
        entry: String,
        member: String,
        type_name: String,
    },

    #[error("member `{member}` of `{entry}` is both `vector` and `optional`")]
    #[diagnostic(
        code(astgen::grammar::optional_vector),
        help("an empty vector already means absent; drop `optional`")
    )]
    OptionalVector { entry: String, member: String },

    #[error("group `{entry}` redeclares a concrete kind from an earlier document")]
    #[diagnostic(
        code(astgen::grammar::group_over_kind),
        help("only a group can be extended by a later document")
    )]
    GroupOverKind { entry: String },

    #[error("`{name}` in `{entry}` is not a valid C++ identifier")]
    #[diagnostic(code(astgen::grammar::invalid_identifier))]
    InvalidIdentifier { entry: String, name: String },

    #[error("kinds `{other}` and `{entry}` both map to the enum tag `{tag}`")]
    #[diagnostic(
        code(astgen::grammar::tag_collision),
        help("rename one of the kinds so their snake_case spellings differ")
    )]
    TagCollision { entry: String, other: String, tag: String },

    #[error("getter `{getter}` of `{entry}` overrides an incompatible or built-in declaration")]
    #[diagnostic(
        code(astgen::grammar::conflicting_override),
        help("every overriding getter with the same name must return the same member type")
    )]
    ConflictingOverride { entry: String, getter: String },
}

impl GrammarError {
    /// Name of the entry the error was raised for, if any.
    pub fn entry(&self) -> Option<&str> {
        match self {
            GrammarError::Syntax { .. } | GrammarError::NotASequence { .. } => None,
            GrammarError::MalformedEntry { entry, .. }
            | GrammarError::MalformedMember { entry, .. }
            | GrammarError::BothMembersAndChildren { entry }
            | GrammarError::MissingType { entry, .. }
            | GrammarError::DuplicateKind { entry }
            | GrammarError::UnknownType { entry, .. }
            | GrammarError::EmptyGroup { entry }
            | GrammarError::UnknownClassifiedKind { entry, .. }
            | GrammarError::MissingValueMember { entry }
            | GrammarError::UnknownValueType { entry, .. }
            | GrammarError::InvalidMacroField { entry, .. }
            | GrammarError::AddOnScalar { entry, .. }
            | GrammarError::ValueVector { entry, .. }
            | GrammarError::MultipleNodeNames { entry }
            | GrammarError::RootCollision { entry }
            | GrammarError::OptionalValue { entry, .. }
            | GrammarError::OptionalVector { entry, .. }
            | GrammarError::GroupOverKind { entry }
            | GrammarError::InvalidIdentifier { entry, .. }
            | GrammarError::TagCollision { entry, .. }
            | GrammarError::ConflictingOverride { entry, .. } => Some(entry),
        }
    }
}

pub type GrammarResult<T> = Result<T, GrammarError>;
