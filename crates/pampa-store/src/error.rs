//! Errors for chunk artifact storage.

/// Errors that can occur while reading or writing chunk artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("chunk artifact missing for sha {0}")]
    NotFound(String),

    #[error("both plain and encrypted artifacts exist for sha {0}")]
    AmbiguousVariant(String),

    #[error("encryption key not configured: {0}")]
    EncryptionKeyRequired(String),

    #[error("master key malformed: {0}")]
    EncryptionKeyMalformed(String),

    #[error("envelope header malformed or unrecognized")]
    EncryptionFormatUnrecognized,

    #[error("envelope payload invalid: {0}")]
    EncryptionPayloadInvalid(String),

    #[error("decryption failed (wrong key or tampered data)")]
    EncryptionAuthFailed,
}

impl StoreError {
    /// The stable error code for this error, shared across PAMPA
    /// implementations. `None` for errors outside the encryption taxonomy.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::EncryptionKeyRequired(_) => Some("ENCRYPTION_KEY_REQUIRED"),
            Self::EncryptionKeyMalformed(_) => Some("ENCRYPTION_KEY_MALFORMED"),
            Self::EncryptionFormatUnrecognized => Some("ENCRYPTION_FORMAT_UNRECOGNIZED"),
            Self::EncryptionPayloadInvalid(_) => Some("ENCRYPTION_PAYLOAD_INVALID"),
            Self::EncryptionAuthFailed => Some("ENCRYPTION_AUTH_FAILED"),
            Self::Io { .. } | Self::NotFound(_) | Self::AmbiguousVariant(_) => None,
        }
    }
}
