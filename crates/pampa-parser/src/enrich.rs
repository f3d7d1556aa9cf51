//! Metadata enrichment: doc comments, pampa annotations, auto tags,
//! important variables, call-graph seeds, and signatures.

use crate::lang_table::{CALL_KEYWORD_BLACKLIST, CommentPattern};
use pampa_core::ImportantVariable;
use regex::Regex;
use std::sync::LazyLock;

const TECHNICAL_KEYWORDS: &[&str] = &[
    "stripe",
    "payment",
    "session",
    "checkout",
    "auth",
    "authentication",
    "login",
    "register",
    "middleware",
    "database",
    "connection",
    "pool",
    "config",
    "service",
    "controller",
    "model",
    "repository",
    "test",
    "api",
    "customer",
    "user",
    "admin",
    "notification",
    "email",
    "validation",
    "request",
    "response",
    "http",
    "route",
];

const VARIABLE_NAME_HINTS: &[&str] = &[
    "config", "setting", "option", "endpoint", "url", "key", "secret", "token", "api", "service",
    "client", "provider",
];

static DOC_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*\*.*?\*/").unwrap());
static PLAIN_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static PY_DOCSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)("""|''').*?\1"#).unwrap());

static PAMPA_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@pampa-tags:\s*([^\n]+)").unwrap());
static PAMPA_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@pampa-intent:\s*([^\n]+)").unwrap());
static PAMPA_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@pampa-description:\s*([^\n]+)").unwrap());

static CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\$?[A-Za-z_]\w*->|[A-Za-z_]\w*::|[A-Za-z_]\w*\.)*([A-Za-z_]\w*)\s*\(").unwrap()
});

static ALL_CAPS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]{2,}$").unwrap());
static JAVA_STATIC_CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"static\s+(?:final\s+)?[A-Z_]+\s+([A-Z_][A-Z0-9_]*)").unwrap());
static RETURN_TYPE_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s*([\w<>\[\],\s]+)$").unwrap());
static RETURN_TYPE_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"->\s*([\w<>\[\],\s]+)\s*\{?$").unwrap());

/// Scan the up-to-500-byte window preceding a chunk node for a doc
/// comment matching the language's comment shape, keeping the last
/// match if several appear in the window.
#[must_use]
pub fn extract_doc_comment(preceding_source: &str, pattern: CommentPattern) -> Option<String> {
    let window_start = preceding_source.len().saturating_sub(500);
    let window = &preceding_source[window_start..];
    let re = match pattern {
        CommentPattern::DocBlock => &*DOC_BLOCK,
        CommentPattern::PlainBlock => &*PLAIN_BLOCK,
        CommentPattern::PyDocstring => &*PY_DOCSTRING,
    };
    re.find_iter(window).last().map(|m| m.as_str().to_string())
}

/// Pampa annotations parsed out of a doc comment.
#[derive(Debug, Default, Clone)]
pub struct PampaAnnotations {
    pub tags: Vec<String>,
    pub intent: Option<String>,
    pub description: Option<String>,
}

/// Parse `@pampa-tags`/`@pampa-intent`/`@pampa-description` out of a doc comment.
#[must_use]
pub fn parse_pampa_annotations(doc_comment: &str) -> PampaAnnotations {
    let tags = PAMPA_TAGS
        .captures(doc_comment)
        .map(|c| {
            c[1]
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let intent = PAMPA_INTENT.captures(doc_comment).map(|c| c[1].trim().to_string());
    let description = PAMPA_DESCRIPTION.captures(doc_comment).map(|c| c[1].trim().to_string());
    PampaAnnotations { tags, intent, description }
}

/// Split an identifier/path on `camelCase`, `_`, `-`, `/` boundaries.
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in text.chars() {
        if ch == '_' || ch == '-' || ch == '/' || ch == '.' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Derive automatic tags from `file_path`, `symbol`, the chunk's code,
/// and any pampa-annotated tags, deduplicated case-insensitively and
/// capped to 10.
#[must_use]
pub fn automatic_tags(file_path: &str, symbol: &str, code: &str, pampa_tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    let mut push = |word: String, seen: &mut std::collections::HashSet<String>, out: &mut Vec<String>| {
        let key = word.to_lowercase();
        if word.len() > 2 && seen.insert(key) {
            out.push(word);
        }
    };

    for word in split_words(file_path).into_iter().chain(split_words(symbol)) {
        push(word, &mut seen, &mut out);
    }

    let code_lower = code.to_lowercase();
    for &kw in TECHNICAL_KEYWORDS {
        if code_lower.contains(kw) {
            push(kw.to_string(), &mut seen, &mut out);
        }
    }

    for tag in pampa_tags {
        push(tag.clone(), &mut seen, &mut out);
    }

    out.truncate(10);
    out
}

/// Decide whether a variable declaration's name/text qualifies as an
/// "important variable" worth recording, returning the truncated record
/// if so.
#[must_use]
pub fn important_variable(name: &str, value: &str, is_java: bool) -> Option<ImportantVariable> {
    let name_lower = name.to_lowercase();
    let qualifies = VARIABLE_NAME_HINTS.iter().any(|hint| name_lower.contains(hint))
        || ALL_CAPS.is_match(name)
        || (is_java && JAVA_STATIC_CONST.is_match(&format!("static {name}")));
    if !qualifies {
        return None;
    }
    let truncated: String = value.chars().take(100).collect();
    Some(ImportantVariable { name: name.to_string(), value: truncated })
}

/// Seed the call graph by scanning `code` for call-expression-shaped
/// text, filtering the language-construct keyword blacklist.
#[must_use]
pub fn call_graph_seed(code: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for caps in CALL_PATTERN.captures_iter(code) {
        let name = caps[1].to_string();
        if CALL_KEYWORD_BLACKLIST.contains(&name.as_str()) {
            continue;
        }
        if seen.insert(name.clone()) {
            out.push(name);
        }
    }
    out
}

/// Extract a chunk's signature: `"class {symbol}"` for classes, else
/// `"{symbol}({params}) : {ret}"` built from a balanced-paren scan of
/// the node's first 400 bytes.
#[must_use]
pub fn extract_signature(symbol: &str, code: &str, is_class: bool) -> (String, Vec<String>, Option<String>) {
    if is_class {
        return (format!("class {symbol}"), Vec::new(), None);
    }

    let window_end = floor_char_boundary(code, code.len().min(400));
    let window = &code[..window_end];

    let Some(open) = window.find('(') else {
        return (format!("{symbol}()"), Vec::new(), None);
    };

    let mut depth = 0i32;
    let mut close = None;
    for (i, ch) in window.char_indices().skip(open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }

    let Some(close) = close else {
        return (format!("{symbol}()"), Vec::new(), None);
    };

    let params_raw = &window[open + 1..close];
    let params = parse_params(params_raw);

    let after_start = floor_char_boundary(code, close + 1);
    let after_end = floor_char_boundary(code, (after_start + 200).min(code.len()));
    let after = &code[after_start..after_end];
    let ret = RETURN_TYPE_ARROW
        .captures(after.trim_end_matches('{').trim())
        .or_else(|| RETURN_TYPE_COLON.captures(after.trim_end_matches('{').trim()))
        .map(|c| c[1].trim().to_string());

    let sig = match &ret {
        Some(r) => format!("{symbol}({}) : {r}", params.join(", ")),
        None => format!("{symbol}({})", params.join(", ")),
    };
    (sig, params, ret)
}

/// Walk an index back to the nearest UTF-8 char boundary at or before it.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn parse_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(strip_default_and_sigils)
        .take(12)
        .collect()
}

fn strip_default_and_sigils(param: &str) -> String {
    let without_default = param.split('=').next().unwrap_or(param).trim();
    without_default.trim_start_matches('*').trim_start_matches('&').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_last_doc_block_in_window() {
        let source = "/** old */\ncode();\n/** newest */\n";
        let doc = extract_doc_comment(source, CommentPattern::DocBlock).unwrap();
        assert_eq!(doc, "/** newest */");
    }

    #[test]
    fn parses_pampa_annotations() {
        let doc = "/**\n * @pampa-tags: stripe, checkout\n * @pampa-intent: start a payment\n */";
        let ann = parse_pampa_annotations(doc);
        assert_eq!(ann.tags, vec!["stripe", "checkout"]);
        assert_eq!(ann.intent.as_deref(), Some("start a payment"));
    }

    #[test]
    fn automatic_tags_splits_and_caps() {
        let tags = automatic_tags(
            "src/stripeCheckoutSession.php",
            "createCheckoutSession",
            "stripe_client->createSession()",
            &["custom".to_string()],
        );
        assert!(tags.iter().any(|t| t.eq_ignore_ascii_case("stripe")));
        assert!(tags.len() <= 10);
    }

    #[test]
    fn automatic_tags_dedupe_case_insensitively() {
        let tags = automatic_tags("a", "Stripe", "stripe", &["STRIPE".to_string()]);
        let count = tags.iter().filter(|t| t.eq_ignore_ascii_case("stripe")).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn important_variable_matches_name_hint() {
        let v = important_variable("STRIPE_SECRET_KEY", "sk_test_abc", false).unwrap();
        assert_eq!(v.name, "STRIPE_SECRET_KEY");
    }

    #[test]
    fn important_variable_rejects_unrelated_name() {
        assert!(important_variable("i", "0", false).is_none());
    }

    #[test]
    fn important_variable_truncates_value() {
        let long = "x".repeat(200);
        let v = important_variable("API_TOKEN", &long, false).unwrap();
        assert_eq!(v.value.len(), 100);
    }

    #[test]
    fn call_graph_seed_filters_keywords() {
        let calls = call_graph_seed("if (x) { stripe->charge(); return doWork(); }");
        assert!(calls.contains(&"charge".to_string()));
        assert!(calls.contains(&"doWork".to_string()));
        assert!(!calls.contains(&"if".to_string()));
        assert!(!calls.contains(&"return".to_string()));
    }

    #[test]
    fn signature_for_class() {
        let (sig, params, ret) = extract_signature("Checkout", "class Checkout {}", true);
        assert_eq!(sig, "class Checkout");
        assert!(params.is_empty());
        assert!(ret.is_none());
    }

    #[test]
    fn signature_for_function_with_return_type() {
        let (sig, params, ret) =
            extract_signature("add", "function add(a, b): int {\n  return a + b;\n}", false);
        assert_eq!(params, vec!["a", "b"]);
        assert_eq!(ret.as_deref(), Some("int"));
        assert_eq!(sig, "add(a, b) : int");
    }

    #[test]
    fn signature_strips_defaults_and_sigils() {
        let (_, params, _) = extract_signature("f", "function f(&$a, $b = 10) {}", false);
        assert_eq!(params, vec!["$a", "$b"]);
    }
}
