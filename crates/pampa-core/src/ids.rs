//! Chunk identity helpers.

use sha1::{Digest, Sha1};

/// Lowercase hex `SHA-1` of UTF-8 code text. This is the content hash
/// tying together the embedding-store row, the codemap entry, and the
/// on-disk chunk artifact.
#[must_use]
pub fn content_sha(code: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(code.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Build the canonical `chunk_id = "{file_path}:{symbol}:{sha[0..8]}"`.
#[must_use]
pub fn chunk_id(file_path: &str, symbol: &str, sha: &str) -> String {
    let short = &sha[..sha.len().min(8)];
    format!("{file_path}:{symbol}:{short}")
}

/// Normalize a file path to repo-relative, POSIX-style separators.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha_is_lowercase_hex_40_chars() {
        let sha = content_sha("fn main() {}");
        assert_eq!(sha.len(), 40);
        assert!(sha.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn sha_is_deterministic() {
        assert_eq!(content_sha("same"), content_sha("same"));
        assert_ne!(content_sha("a"), content_sha("b"));
    }

    #[test]
    fn chunk_id_uses_first_eight_sha_chars() {
        let sha = content_sha("x");
        let id = chunk_id("src/a.php", "foo", &sha);
        assert_eq!(id, format!("src/a.php:foo:{}", &sha[..8]));
    }

    #[test]
    fn normalizes_backslashes() {
        assert_eq!(normalize_path("src\\a\\b.py"), "src/a/b.py");
    }
}
