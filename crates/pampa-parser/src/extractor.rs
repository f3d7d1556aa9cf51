//! Ties AST walking, symbol resolution, and metadata enrichment
//! together into the chunk list for one source file.

use crate::ast::{AstNode, parse_source};
use crate::enrich::{
    automatic_tags, call_graph_seed, extract_doc_comment, extract_signature, important_variable,
    parse_pampa_annotations,
};
use crate::error::ParserError;
use crate::lang_table::rule_for;
use crate::symbol::resolve;
use crate::types::ExtractedChunk;
use pampa_core::{ChunkType, Language};

/// Extract chunk candidates from a source file's text.
///
/// Never fails outright: if AST-level extraction finds no chunk nodes
/// the whole file is returned as a single `ChunkType::File` chunk, and
/// parser panics are not possible since ast-grep always returns a tree
/// (possibly full of `ERROR` nodes) rather than erroring.
pub fn extract(file_path: &str, source: &str, lang: Language) -> Result<Vec<ExtractedChunk>, ParserError> {
    let rule = rule_for(lang);
    let tree = parse_source(source, lang);
    let root = tree.root();

    let mut chunks = Vec::new();
    walk(&root, file_path, source, lang, rule.chunk_kinds, &mut chunks);

    if chunks.is_empty() {
        chunks.push(whole_file_fallback(file_path, source, lang)?);
    }

    Ok(chunks)
}

fn whole_file_fallback(
    file_path: &str,
    source: &str,
    lang: Language,
) -> Result<ExtractedChunk, ParserError> {
    if source.is_empty() {
        return Err(ParserError::FallbackFailed(file_path.to_string()));
    }
    let symbol = std::path::Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_path)
        .to_string();
    let tags = automatic_tags(file_path, &symbol, source, &[]);
    let line_count = source.lines().count().max(1) as u32;
    Ok(ExtractedChunk {
        lang,
        chunk_type: ChunkType::File,
        symbol,
        code: source.to_string(),
        start_line: 1,
        end_line: line_count,
        doc_comment: None,
        tags,
        intent: None,
        description: None,
        variables: Vec::new(),
        calls: call_graph_seed(source),
        signature: format!("file({file_path})"),
        parameters: Vec::new(),
        return_type: None,
    })
}

fn walk<'t>(
    node: &AstNode<'t>,
    file_path: &str,
    source: &str,
    lang: Language,
    chunk_kinds: &[&str],
    out: &mut Vec<ExtractedChunk>,
) {
    let kind = node.kind();
    if chunk_kinds.contains(&kind.as_ref()) {
        out.push(build_chunk(node, file_path, source, lang));
    }
    for child in node.children() {
        walk(&child, file_path, source, lang, chunk_kinds, out);
    }
}

fn build_chunk<'t>(node: &AstNode<'t>, file_path: &str, source: &str, lang: Language) -> ExtractedChunk {
    let rule = rule_for(lang);
    let kind = node.kind();
    let is_class = kind.as_ref().contains("class");
    let code = node.text().to_string();
    let start_line = node.start_pos().line() as u32 + 1;
    let end_line = node.end_pos().line() as u32 + 1;

    let start_byte = byte_offset_of_node(node, source);
    let symbol = resolve(node, start_byte);

    let preceding = &source[..start_byte.min(source.len())];
    let doc_comment = extract_doc_comment(preceding, rule.comment_pattern);
    let annotations = doc_comment
        .as_deref()
        .map(parse_pampa_annotations)
        .unwrap_or_default();

    let tags = automatic_tags(file_path, &symbol, &code, &annotations.tags);
    let calls = call_graph_seed(&code);
    let variables = collect_variables(node, lang, rule.variable_kinds);

    let chunk_type = if is_class {
        ChunkType::Class
    } else if kind.as_ref().contains("method") {
        ChunkType::Method
    } else {
        ChunkType::Function
    };

    let (signature, parameters, return_type) = extract_signature(&symbol, &code, is_class);

    ExtractedChunk {
        lang,
        chunk_type,
        symbol,
        code,
        start_line,
        end_line,
        doc_comment,
        tags,
        intent: annotations.intent,
        description: annotations.description,
        variables,
        calls,
        signature,
        parameters,
        return_type,
    }
}

fn collect_variables<'t>(
    node: &AstNode<'t>,
    lang: Language,
    variable_kinds: &[&str],
) -> Vec<pampa_core::ImportantVariable> {
    let is_java = matches!(lang, Language::Java);
    let mut out = Vec::new();
    collect_variables_rec(node, variable_kinds, is_java, &mut out);
    out
}

fn collect_variables_rec<'t>(
    node: &AstNode<'t>,
    variable_kinds: &[&str],
    is_java: bool,
    out: &mut Vec<pampa_core::ImportantVariable>,
) {
    if variable_kinds.contains(&node.kind().as_ref()) {
        let text = node.text().to_string();
        if let Some((name, value)) = split_name_value(&text) {
            if let Some(v) = important_variable(&name, &value, is_java) {
                out.push(v);
            }
        }
    }
    for child in node.children() {
        collect_variables_rec(&child, variable_kinds, is_java, out);
    }
}

/// Best-effort `name = value` / `name: value` split of a variable
/// declaration's raw text, used because the per-language grammars
/// don't share a single field layout for assignment targets.
fn split_name_value(text: &str) -> Option<(String, String)> {
    let trimmed = text.trim();
    let sep = trimmed.find('=').or_else(|| trimmed.find(':'))?;
    let name_part = trimmed[..sep].trim();
    let name = name_part
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or(name_part)
        .trim_start_matches("static")
        .trim_start_matches("final")
        .trim_start_matches("const")
        .trim_start_matches("var")
        .trim_start_matches("let")
        .trim()
        .to_string();
    let value = trimmed[sep + 1..].trim().trim_end_matches(';').to_string();
    if name.is_empty() || value.is_empty() {
        None
    } else {
        Some((name, value))
    }
}

/// Resolve a node's start byte offset in `source` from its line/column
/// position, since ast-grep's `Node` exposes positions, not byte ranges.
fn byte_offset_of_node<'t>(node: &AstNode<'t>, source: &str) -> usize {
    let line = node.start_pos().line();
    let column_chars = node.start_pos().column(node);
    let line_start = line_start_byte_offset(source, line);
    let line_text = &source[line_start..];
    let char_byte_offset: usize = line_text
        .char_indices()
        .nth(column_chars)
        .map_or(line_text.len(), |(b, _)| b);
    line_start + char_byte_offset
}

/// Byte offset of the start of zero-based line `line` in `source`.
fn line_start_byte_offset(source: &str, line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth(line - 1)
        .map_or(source.len(), |(i, _)| i + 1)
}
