//! Identifier conventions shared by the loader and every emitter.
//!
//! Generated method names (`visit_binary_expression`, `get_node_type`), enum tags
//! (`BINARY_EXPRESSION`) and accessor names are all derived from `class_name` / `varname`
//! through these helpers, so both sides of every emitted contract spell them identically.

/// Convert a `CamelCase` identifier to `snake_case`.
///
/// Runs of capitals are kept together until the last capital that starts a new word,
/// so `ABCBlock` becomes `abc_block` and `LinEquation2D` becomes `lin_equation2_d`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase() || prev.is_ascii_digit() || (next_is_lower && prev != '_');
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }

    out
}

/// Convert a `CamelCase` identifier to `UPPER_SNAKE_CASE` (enum tag spelling).
pub fn to_upper_snake_case(name: &str) -> String {
    to_snake_case(name).to_ascii_uppercase()
}

/// Whether `name` can be used verbatim as a C++ identifier.
pub fn is_cpp_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escape a literal so it can be embedded in a double-quoted C++ string.
pub fn escape_cpp_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}
