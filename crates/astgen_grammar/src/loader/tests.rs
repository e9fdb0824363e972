use std::collections::BTreeMap;

use super::*;

/// Small statement/expression grammar used across the loader tests.
const STATEMENTS: &str = r#"
- Stmt:
    brief: "statement"
    children:
      - Return:
          keyword: "return "
          members:
            - value:
                type: Expr
      - If:
          members:
            - cond:
                type: Expr
                prefix: { value: "if (", force: true }
                suffix: { value: ") ", force: true }
            - then_branch:
                type: Stmt
            - else_branch:
                type: Stmt
                optional: true
                prefix: " else "
- Expr:
"#;

fn load(source: &str) -> GrammarResult<Grammar> {
    load_str(source, &Classification::default(), &LoadOptions::default())
}

fn names(grammar: &Grammar) -> Vec<&str> {
    grammar.nodes().iter().map(|n| n.class_name.as_str()).collect()
}

// ============================================================================
// Flattening
// ============================================================================

#[test]
fn test_group_resolves_abstract_and_concrete_kinds() {
    let g = load(STATEMENTS).unwrap();
    assert_eq!(names(&g), vec!["Stmt", "Return", "If", "Expr"]);

    let stmt = g.get("Stmt").unwrap();
    assert!(stmt.is_abstract);
    assert_eq!(stmt.base_class, "Ast");
    assert_eq!(stmt.brief.as_deref(), Some("statement"));

    for kind in ["Return", "If"] {
        let n = g.get(kind).unwrap();
        assert!(!n.is_abstract, "{kind} should be concrete");
        assert_eq!(n.base_class, "Stmt");
    }
    assert_eq!(g.get("Expr").unwrap().base_class, "Ast");
    assert_eq!(g.concrete().count(), 3);
}

#[test]
fn test_nested_groups_flatten_depth_first() {
    let g = load(
        r#"
- Expression:
    children:
      - Number:
          children:
            - Integer:
            - Double:
      - Name:
- Program:
"#,
    )
    .unwrap();
    insta::assert_snapshot!(names(&g).join(" "), @"Expression Number Integer Double Name Program");
    assert_eq!(g.get("Integer").unwrap().base_class, "Number");
    assert_eq!(g.get("Number").unwrap().base_class, "Expression");
    assert_eq!(g.get("Name").unwrap().base_class, "Expression");
}

#[test]
fn test_keyword_and_affixes_carried_to_model() {
    let g = load(STATEMENTS).unwrap();
    assert_eq!(g.get("Return").unwrap().keyword.as_deref(), Some("return "));

    let if_node = g.get("If").unwrap();
    let cond = if_node.child("cond").unwrap();
    assert_eq!(cond.forced_prefix(), Some("if ("));
    assert_eq!(cond.forced_suffix(), Some(") "));
    let else_branch = if_node.child("else_branch").unwrap();
    assert!(else_branch.is_optional());
    assert_eq!(else_branch.unforced_prefix(), Some(" else "));
}

#[test]
fn test_member_ownership() {
    let g = load(
        r#"
- Name:
    members:
      - value: { type: std::string }
      - order: { type: int }
- List:
    members:
      - items: { type: Name, vector: true, separator: ", ", add: true }
      - head: { type: Name }
      - tail: { type: Name, optional: true }
"#,
    )
    .unwrap();

    let name = g.get("Name").unwrap();
    let value = name.child("value").unwrap();
    assert!(value.is_value());
    assert!(!value.is_integral);
    assert!(name.child("order").unwrap().is_integral);

    let list = g.get("List").unwrap();
    let items = list.child("items").unwrap();
    assert!(items.is_vector());
    assert!(items.add_method);
    assert_eq!(items.ownership, Ownership::Owned);
    assert!(list.child("head").unwrap().is_owned());
    assert!(list.child("tail").unwrap().is_owned());
}

#[test]
fn test_value_kind_is_embedded() {
    let classification = Classification {
        value_kinds: vec!["Unit".into()],
        ..Classification::default()
    };
    let g = load_str(
        r#"
- Unit:
    members:
      - name: { type: std::string }
- Quantity:
    members:
      - unit: { type: Unit }
      - alt: { type: Unit, optional: true }
"#,
        &classification,
        &LoadOptions::default(),
    )
    .unwrap();
    let q = g.get("Quantity").unwrap();
    assert!(q.child("unit").unwrap().is_embedded());
    assert!(q.child("alt").unwrap().is_owned());
    assert!(g.get("Unit").unwrap().requires_default_constructor());
}

#[test]
fn test_custom_root_class() {
    let options = LoadOptions::new().with_root_class("Node");
    let g = load_str("- Expr:\n", &Classification::default(), &options).unwrap();
    assert_eq!(g.root_class(), "Node");
    assert_eq!(g.get("Expr").unwrap().base_class, "Node");
}

// ============================================================================
// Classification
// ============================================================================

fn classified() -> Classification {
    Classification {
        program: Some("Program".into()),
        base_block: Some("Block".into()),
        number: Some("Number".into()),
        boolean: Some("Boolean".into()),
        statements: vec!["Return".into()],
        symbol_vars: vec!["LocalVar".into()],
        data_types: BTreeMap::from([
            ("Integer".to_string(), "int".to_string()),
            ("Boolean".to_string(), "bool".to_string()),
            ("Op".to_string(), "BinaryOp".to_string()),
        ]),
        macro_values: BTreeMap::from([("Integer".to_string(), "macro".to_string())]),
        ..Classification::default()
    }
}

const CLASSIFIED: &str = r#"
- Program:
    members:
      - blocks: { type: Block, vector: true }
- Block:
    children:
      - Procedure:
          members:
            - body: { type: Return, vector: true }
- Number:
    children:
      - Integer:
          members:
            - value: { type: int }
            - macro: { type: LocalVar, optional: true }
      - Boolean:
          members:
            - value: { type: bool }
- Op:
    members:
      - value: { type: BinaryOp }
- Return:
    members:
      - value: { type: Number }
- LocalVar:
    members:
      - name: { type: std::string, node_name: true }
"#;

fn options_with_enum() -> LoadOptions {
    LoadOptions::new().with_enum_types(["BinaryOp"])
}

#[test]
fn test_roles_resolved_on_nodes() {
    let g = load_str(CLASSIFIED, &classified(), &options_with_enum()).unwrap();

    let program = g.get("Program").unwrap();
    assert!(program.is_program());
    assert!(program.is_symtab_needed());
    assert!(program.is_symtab_method_required());

    let block = g.get("Block").unwrap();
    assert!(block.is_abstract);
    assert!(!block.is_block_scoped());

    let procedure = g.get("Procedure").unwrap();
    assert!(procedure.is_block_scoped());
    assert!(procedure.renders_as_block());

    assert!(g.get("Return").unwrap().is_statement());
    assert!(g.get("LocalVar").unwrap().is_symbol_var());

    let integer = g.get("Integer").unwrap();
    assert!(integer.is_negatable());
    assert_eq!(integer.negation_operator(), "-");
    assert_eq!(integer.macro_field.as_deref(), Some("macro"));
    let dt = integer.data_type.as_ref().unwrap();
    assert_eq!(dt.cpp_type, "int");
    assert!(dt.is_integral);
    assert!(!dt.is_enum);

    assert_eq!(g.get("Boolean").unwrap().negation_operator(), "!");
    assert!(g.get("Op").unwrap().data_type.as_ref().unwrap().is_enum);
}

#[test]
fn test_child_type_roles() {
    let g = load_str(CLASSIFIED, &classified(), &options_with_enum()).unwrap();
    let body = g.get("Procedure").unwrap().child("body").unwrap();
    assert!(body.is_statement_type());
    let op_value = g.get("Op").unwrap().child("value").unwrap();
    assert!(op_value.is_enum);
    assert!(op_value.is_integral);
}

#[test]
fn test_classification_names_undeclared_kind() {
    let classification = Classification {
        statements: vec!["Retrun".into()],
        ..Classification::default()
    };
    let err = load_str(STATEMENTS, &classification, &LoadOptions::default()).unwrap_err();
    assert_eq!(
        err,
        GrammarError::UnknownClassifiedKind {
            table: "statements",
            entry: "Retrun".into()
        }
    );
    assert!(err.to_string().contains("Retrun"));
}

#[test]
fn test_data_type_requires_value_member() {
    let classification = Classification {
        data_types: BTreeMap::from([("Expr".to_string(), "int".to_string())]),
        ..Classification::default()
    };
    let err = load_str(STATEMENTS, &classification, &LoadOptions::default()).unwrap_err();
    assert_eq!(err, GrammarError::MissingValueMember { entry: "Expr".into() });
}

#[test]
fn test_data_type_must_be_value_type() {
    let classification = Classification {
        data_types: BTreeMap::from([("Op".to_string(), "BinaryOp".to_string())]),
        ..Classification::default()
    };
    let err = load_str("- Op:\n    members:\n      - value: { type: int }\n", &classification, &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, GrammarError::UnknownValueType { ref type_name, .. } if type_name == "BinaryOp"));
}

#[test]
fn test_macro_field_must_be_optional() {
    let classification = Classification {
        macro_values: BTreeMap::from([("Return".to_string(), "value".to_string())]),
        ..Classification::default()
    };
    let err = load_str(STATEMENTS, &classification, &LoadOptions::default()).unwrap_err();
    assert_eq!(
        err,
        GrammarError::InvalidMacroField {
            entry: "Return".into(),
            member: "value".into()
        }
    );
}

// ============================================================================
// Structural errors
// ============================================================================

#[test]
fn test_duplicate_kind_rejected() {
    let err = load("- Expr:\n- Stmt:\n    children:\n      - Expr:\n").unwrap_err();
    assert_eq!(err, GrammarError::DuplicateKind { entry: "Expr".into() });
}

#[test]
fn test_unknown_member_type() {
    let err = load("- Return:\n    members:\n      - value: { type: Expresion }\n").unwrap_err();
    assert_eq!(
        err,
        GrammarError::UnknownType {
            entry: "Return".into(),
            member: "value".into(),
            type_name: "Expresion".into()
        }
    );
}

#[test]
fn test_member_may_reference_later_kind() {
    let g = load("- Return:\n    members:\n      - value: { type: Expr }\n- Expr:\n").unwrap();
    assert!(g.get("Return").unwrap().child("value").unwrap().is_owned());
}

#[test]
fn test_add_requires_vector() {
    let err = load("- A:\n    members:\n      - b: { type: A, add: true }\n").unwrap_err();
    assert!(matches!(err, GrammarError::AddOnScalar { .. }));
}

#[test]
fn test_vector_of_value_type_rejected() {
    let err = load("- A:\n    members:\n      - b: { type: int, vector: true }\n").unwrap_err();
    assert!(matches!(err, GrammarError::ValueVector { .. }));
}

#[test]
fn test_multiple_node_names_rejected() {
    let err = load(
        "- A:\n    members:\n      - b: { type: std::string, node_name: true }\n      - c: { type: std::string, node_name: true }\n",
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::MultipleNodeNames { entry: "A".into() });
}

#[test]
fn test_root_collision_rejected() {
    let err = load("- Ast:\n").unwrap_err();
    assert_eq!(err, GrammarError::RootCollision { entry: "Ast".into() });
}

// ============================================================================
// Overlays
// ============================================================================

#[test]
fn test_overlay_skips_already_declared_kinds() {
    let overlay = r#"
- Expr:
    members:
      - ignored: { type: int }
- Wrapper:
    members:
      - inner: { type: Expr }
"#;
    let g = load_documents(
        &[("base.yaml", STATEMENTS), ("overlay.yaml", overlay)],
        &Classification::default(),
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(names(&g), vec!["Stmt", "Return", "If", "Expr", "Wrapper"]);
    assert!(!g.get("Expr").unwrap().has_children());
}

#[test]
fn test_overlay_extends_existing_group() {
    let overlay = "- Stmt:\n    children:\n      - While:\n          members:\n            - cond: { type: Expr }\n";
    let g = load_documents(
        &[("base.yaml", STATEMENTS), ("overlay.yaml", overlay)],
        &Classification::default(),
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(g.get("While").unwrap().base_class, "Stmt");
    assert_eq!(g.nodes().last().map(|n| n.class_name.as_str()), Some("While"));
}

#[test]
fn test_error_in_overlay_names_entry() {
    let overlay = "- Bad:\n    members:\n      - x: { type: Nope }\n";
    let err = load_documents(
        &[("base.yaml", STATEMENTS), ("overlay.yaml", overlay)],
        &Classification::default(),
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.entry(), Some("Bad"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_optional_value_member_rejected() {
    let err = load("- Label:\n    members:\n      - text: { type: std::string, optional: true, prefix: \": \" }\n")
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::OptionalValue {
            entry: "Label".into(),
            member: "text".into(),
            type_name: "std::string".into(),
        }
    );
}

#[test]
fn test_optional_vector_rejected() {
    let err = load("- A:\n    members:\n      - b: { type: A, vector: true, optional: true }\n").unwrap_err();
    assert!(matches!(err, GrammarError::OptionalVector { ref member, .. } if member == "b"));
}

#[test]
fn test_overlay_cannot_turn_kind_into_group() {
    let overlay = "- Expr:\n    children:\n      - Lit:\n";
    let err = load_documents(
        &[("base.yaml", STATEMENTS), ("overlay.yaml", overlay)],
        &Classification::default(),
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::GroupOverKind { entry: "Expr".into() });
}

#[test]
fn test_kinds_with_same_enum_tag_rejected() {
    let err = load("- IOBlock:\n- IoBlock:\n").unwrap_err();
    assert_eq!(
        err,
        GrammarError::TagCollision {
            entry: "IoBlock".into(),
            other: "IOBlock".into(),
            tag: "IO_BLOCK".into(),
        }
    );
}

#[test]
fn test_kind_name_must_be_identifier() {
    let err = load("- my-kind:\n").unwrap_err();
    assert!(matches!(err, GrammarError::InvalidIdentifier { ref name, .. } if name == "my-kind"));
}

#[test]
fn test_member_name_must_be_identifier() {
    let err = load("- Kind:\n    members:\n      - 1x: { type: int }\n").unwrap_err();
    assert_eq!(
        err,
        GrammarError::InvalidIdentifier {
            entry: "Kind".into(),
            name: "1x".into(),
        }
    );
}

#[test]
fn test_override_of_builtin_getter_rejected() {
    let err = load(
        "- A:\n    members:\n      - label: { type: std::string, getter: { name: get_node_name, override: true } }\n",
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::ConflictingOverride { ref getter, .. } if getter == "get_node_name"));
}

#[test]
fn test_overrides_must_agree_on_type() {
    let source = r#"
- Block:
- Proc:
    members:
      - body: { type: Block, getter: { name: get_body, override: true } }
- Func:
    members:
      - body: { type: Block, vector: true, getter: { name: get_body, override: true } }
"#;
    let err = load(source).unwrap_err();
    assert_eq!(
        err,
        GrammarError::ConflictingOverride {
            entry: "Func".into(),
            getter: "get_body".into(),
        }
    );
}

#[test]
fn test_matching_overrides_accepted() {
    let source = r#"
- Block:
- Proc:
    members:
      - body: { type: Block, getter: { name: get_body, override: true } }
- Func:
    members:
      - body: { type: Block, getter: { name: get_body, override: true } }
"#;
    let g = load(source).unwrap();
    assert_eq!(g.override_getters().len(), 1);
}
