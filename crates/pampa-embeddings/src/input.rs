//! Builds the single input string fed to an embedding provider for a chunk.

/// Fields drawn from a chunk (or extracted-chunk candidate) needed to
/// assemble embedding input text.
pub struct EmbeddingInputFields<'a> {
    pub doc_comments: Option<&'a str>,
    pub code: &'a str,
    pub intent: Option<&'a str>,
    pub description: Option<&'a str>,
    pub tags: &'a [String],
    pub variables: &'a [String],
}

/// Concatenate doc comments, code, and annotations into the single
/// string an embedding provider embeds.
#[must_use]
pub fn build_embedding_input(fields: &EmbeddingInputFields<'_>) -> String {
    let mut parts = Vec::new();
    if let Some(doc) = fields.doc_comments {
        parts.push(doc.to_string());
        parts.push(String::new());
    }
    parts.push(fields.code.to_string());
    if let Some(intent) = fields.intent {
        parts.push(format!("// Intent: {intent}"));
    }
    if let Some(description) = fields.description {
        parts.push(format!("// Description: {description}"));
    }
    if !fields.tags.is_empty() {
        parts.push(format!("// Tags: {}", fields.tags.join(", ")));
    }
    if !fields.variables.is_empty() {
        parts.push(format!("// Uses variables: {}", fields.variables.join(", ")));
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_fields_in_order() {
        let input = build_embedding_input(&EmbeddingInputFields {
            doc_comments: Some("/** starts a checkout */"),
            code: "function createCheckoutSession() {}",
            intent: Some("start a payment"),
            description: None,
            tags: &["stripe".to_string(), "checkout".to_string()],
            variables: &["STRIPE_KEY".to_string()],
        });
        assert!(input.starts_with("/** starts a checkout */\n\nfunction createCheckoutSession"));
        assert!(input.contains("// Intent: start a payment"));
        assert!(input.contains("// Tags: stripe, checkout"));
        assert!(input.contains("// Uses variables: STRIPE_KEY"));
        assert!(!input.contains("// Description"));
    }

    #[test]
    fn minimal_chunk_is_just_code() {
        let input = build_embedding_input(&EmbeddingInputFields {
            doc_comments: None,
            code: "x()",
            intent: None,
            description: None,
            tags: &[],
            variables: &[],
        });
        assert_eq!(input, "x()");
    }
}
