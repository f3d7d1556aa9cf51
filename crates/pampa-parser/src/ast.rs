//! ast-grep wrapper: language resolution and source parsing.

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::{LanguageExt, SupportLang};
use pampa_core::Language;

/// The concrete AST tree type returned by `parse_source`.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;
/// A node in an [`AstTree`].
pub type AstNode<'t> = ast_grep_core::Node<'t, StrDoc<SupportLang>>;

/// Map a [`Language`] to its ast-grep `SupportLang`.
#[must_use]
pub const fn support_lang(lang: Language) -> SupportLang {
    crate::lang_table::rule_for(lang).support_lang
}

/// Parse source code into an ast-grep tree.
#[must_use]
pub fn parse_source(source: &str, lang: Language) -> AstTree {
    support_lang(lang).ast_grep(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_php_source() {
        let tree = parse_source("<?php function hello() {}", Language::Php);
        assert_eq!(tree.root().kind().as_ref(), "program");
    }

    #[test]
    fn parses_python_source() {
        let tree = parse_source("def hello():\n    pass\n", Language::Python);
        assert_eq!(tree.root().kind().as_ref(), "module");
    }

    #[test]
    fn parses_go_source() {
        let tree = parse_source("package main\nfunc main() {}\n", Language::Go);
        assert_eq!(tree.root().kind().as_ref(), "source_file");
    }
}
