//! Integer literal grammar shared by argument validation and result parsing.
//!
//! A literal is an optional leading `-` followed by one or more ASCII digits
//! (`^-?[0-9]+$`). Literals stay text so values wider than any fixed-size
//! integer pass through unchanged.

use std::sync::LazyLock;

use regex::Regex;

static INTEGER_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());

/// Returns true if `text` fully matches the integer literal grammar.
pub fn is_integer_literal(text: &str) -> bool {
    INTEGER_LITERAL_RE.is_match(text)
}
