//! `ast_decl.hpp`: forward declarations, the kind enum and vector aliases.
//!
//! All three sections list every kind (abstract kinds included) and only need names, so
//! this artifact is independent of the order kinds are defined in `ast.hpp`.

use astgen_grammar::Grammar;

use super::{start, vector_alias};
use crate::config::GeneratorConfig;

pub const ARTIFACT: &str = "ast_decl.hpp";

#[tracing::instrument(skip_all, fields(kinds = grammar.len()))]
pub fn emit(grammar: &Grammar, config: &GeneratorConfig) -> String {
    let mut w = start(ARTIFACT, config);
    w.pragma_once();
    w.include_system("memory");
    w.include_system("vector");
    w.blank();

    w.namespace_open(&config.visitor_namespace());
    w.line("class Visitor;");
    w.blank();
    w.namespace_close(&config.visitor_namespace());
    w.blank();

    w.namespace_open(&config.ast_namespace());

    w.brief("Forward declarations of every node kind");
    w.line(&format!("struct {};", grammar.root_class()));
    for node in grammar.nodes() {
        w.line(&format!("class {};", node.class_name));
    }
    w.blank();

    w.brief("Kind tag of every node");
    w.open("enum class AstNodeType {");
    let count = grammar.len();
    for (i, node) in grammar.nodes().iter().enumerate() {
        let comma = if i + 1 < count { "," } else { "" };
        match &node.brief {
            Some(brief) => w.line(&format!("{}{comma}  ///< {}", node.enum_name(), brief.trim())),
            None => w.line(&format!("{}{comma}", node.enum_name())),
        }
    }
    w.close("};");
    w.blank();

    w.brief("Owning vectors of every node kind");
    for node in grammar.nodes() {
        w.line(&format!(
            "using {} = std::vector<std::unique_ptr<{}>>;",
            vector_alias(&node.class_name),
            node.class_name
        ));
    }
    w.blank();

    w.namespace_close(&config.ast_namespace());
    w.finish()
}
