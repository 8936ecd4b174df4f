//! Treeherder symbol helpers.
//!
//! A symbol is displayed as `group(leaf)`; a symbol without a group is just `leaf`
//! and splits to the placeholder group `?`.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder group used when a symbol carries no group.
pub const NO_GROUP: &str = "?";

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([^(]*)\(([^)]*)\)").expect("static symbol pattern"))
}

/// Split `group(leaf)` into `(group, leaf)`.
pub fn split_symbol(symbol: &str) -> (String, String) {
    if symbol.contains('(') {
        if let Some(captures) = symbol_pattern().captures(symbol) {
            return (captures[1].to_string(), captures[2].to_string());
        }
    }
    (NO_GROUP.to_string(), symbol.to_string())
}

/// Inverse of [`split_symbol`].
pub fn join_symbol(group: &str, leaf: &str) -> String {
    if group == NO_GROUP {
        leaf.to_string()
    } else {
        format!("{}({})", group, leaf)
    }
}
