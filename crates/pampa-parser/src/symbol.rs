//! Symbol name resolution for a chunk node.

use crate::ast::AstNode;
use crate::lang_table::SYMBOL_KEYWORD_BLACKLIST;
use regex::Regex;
use std::sync::LazyLock;

static FALLBACK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"function\s+(\w+)").unwrap(),
        Regex::new(r"class\s+(\w+)").unwrap(),
        Regex::new(r"(\w+)\s*\([^)]*\)\s*\{").unwrap(),
    ]
});

/// Resolve a chunk node's symbol name.
///
/// 1. Descend for the first identifier-like child whose text isn't a
///    declaration keyword.
/// 2. Fall back to regexes over the node's source text.
/// 3. Synthesize `"{node_kind}_{start_byte}"`.
#[must_use]
pub fn resolve<'t>(node: &AstNode<'t>, start_byte: usize) -> String {
    if let Some(name) = first_identifier_child(node) {
        return name;
    }
    let text = node.text();
    for pattern in FALLBACK_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text.as_ref()) {
            if let Some(m) = caps.get(1) {
                return m.as_str().to_string();
            }
        }
    }
    format!("{}_{start_byte}", node.kind())
}

fn first_identifier_child<'t>(node: &AstNode<'t>) -> Option<String> {
    if let Some(name_field) = node.field("name") {
        let text = name_field.text().to_string();
        if is_usable_identifier(&text) {
            return Some(text);
        }
    }
    for child in node.children() {
        let kind = child.kind();
        if !(kind.as_ref().contains("identifier") || kind.as_ref() == "name") {
            continue;
        }
        let text = child.text().to_string();
        if is_usable_identifier(&text) {
            return Some(text);
        }
    }
    None
}

fn is_usable_identifier(text: &str) -> bool {
    !text.is_empty()
        && !SYMBOL_KEYWORD_BLACKLIST.contains(&text)
        && text.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
}
