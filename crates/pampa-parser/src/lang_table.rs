//! Per-language chunk/variable node kinds and doc-comment patterns.
//!
//! This table is the single source of truth for what the extractor
//! treats as a chunk boundary in each language. Keep it in sync with
//! the language rules documented for the extractor.

use ast_grep_language::SupportLang;
use pampa_core::Language;

/// The doc-comment shape a language uses, scanned in the ≤500 bytes
/// preceding a chunk node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPattern {
    /// `/** ... */`
    DocBlock,
    /// `/* ... */`
    PlainBlock,
    /// `"""..."""` or `'''...'''`
    PyDocstring,
}

/// Node kinds and comment pattern for one language.
pub struct LangRule {
    pub chunk_kinds: &'static [&'static str],
    pub variable_kinds: &'static [&'static str],
    pub comment_pattern: CommentPattern,
    pub support_lang: SupportLang,
}

/// Look up the extraction rule for a language.
#[must_use]
pub const fn rule_for(lang: Language) -> LangRule {
    match lang {
        Language::Php => LangRule {
            chunk_kinds: &["function_definition", "method_declaration"],
            variable_kinds: &["const_declaration", "assignment_expression"],
            comment_pattern: CommentPattern::DocBlock,
            support_lang: SupportLang::Php,
        },
        Language::Python => LangRule {
            chunk_kinds: &["function_definition", "class_definition"],
            variable_kinds: &["assignment", "expression_statement"],
            comment_pattern: CommentPattern::PyDocstring,
            support_lang: SupportLang::Python,
        },
        Language::JavaScript => LangRule {
            chunk_kinds: &["function_declaration", "method_definition", "class_declaration"],
            variable_kinds: &["lexical_declaration", "variable_declaration"],
            comment_pattern: CommentPattern::DocBlock,
            support_lang: SupportLang::JavaScript,
        },
        Language::Tsx => LangRule {
            chunk_kinds: &["function_declaration", "class_declaration"],
            variable_kinds: &["lexical_declaration", "variable_declaration"],
            comment_pattern: CommentPattern::DocBlock,
            support_lang: SupportLang::Tsx,
        },
        Language::TypeScript => LangRule {
            chunk_kinds: &["function_declaration", "method_definition", "class_declaration"],
            variable_kinds: &["lexical_declaration", "variable_declaration"],
            comment_pattern: CommentPattern::DocBlock,
            support_lang: SupportLang::TypeScript,
        },
        Language::Go => LangRule {
            chunk_kinds: &["function_declaration", "method_declaration"],
            variable_kinds: &["const_declaration", "var_declaration"],
            comment_pattern: CommentPattern::PlainBlock,
            support_lang: SupportLang::Go,
        },
        Language::Java => LangRule {
            chunk_kinds: &["method_declaration", "class_declaration"],
            variable_kinds: &["variable_declaration", "field_declaration"],
            comment_pattern: CommentPattern::DocBlock,
            support_lang: SupportLang::Java,
        },
    }
}

/// Keywords that can never be a declaration's own name — used to skip
/// modifier/keyword tokens when descending for the symbol identifier.
pub const SYMBOL_KEYWORD_BLACKLIST: &[&str] = &[
    "public", "private", "protected", "static", "function", "class", "abstract", "final",
    "const", "var", "let",
];

/// Keywords that can never be an outgoing call target — filters control
/// flow and language constructs out of the call-graph seed.
pub const CALL_KEYWORD_BLACKLIST: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "class", "new", "await",
    "yield", "isset", "empty", "echo", "print", "require", "include",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn php_rule_matches_spec_table() {
        let rule = rule_for(Language::Php);
        assert_eq!(rule.chunk_kinds, &["function_definition", "method_declaration"]);
        assert_eq!(rule.comment_pattern, CommentPattern::DocBlock);
    }

    #[test]
    fn python_rule_uses_docstring_pattern() {
        let rule = rule_for(Language::Python);
        assert_eq!(rule.comment_pattern, CommentPattern::PyDocstring);
    }

    #[test]
    fn go_rule_uses_plain_block_comment() {
        let rule = rule_for(Language::Go);
        assert_eq!(rule.comment_pattern, CommentPattern::PlainBlock);
    }
}
