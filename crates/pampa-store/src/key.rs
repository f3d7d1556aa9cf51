//! Master key loading and per-chunk key derivation.

use crate::error::StoreError;
use hkdf::Hkdf;
use sha2::Sha256;

/// Info string mixed into every chunk key derivation, distinguishing
/// this key schedule from any future one sharing the same master key.
const HKDF_INFO: &[u8] = b"pampa-chunk-v1";

/// The 32-byte master key used to derive per-chunk AES-256 keys.
#[derive(Clone)]
pub struct MasterKey([u8; 32]);

impl MasterKey {
    /// Decode a master key from a base64 or hex string. Tries base64
    /// first (PAMPA's documented format), then hex.
    pub fn decode(raw: &str) -> Result<Self, StoreError> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(raw.trim())
            .or_else(|_| hex_decode(raw.trim()))
            .map_err(|_| StoreError::EncryptionKeyMalformed("not valid base64 or hex".to_string()))?;
        let len = bytes.len();
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StoreError::EncryptionKeyMalformed(format!("expected 32 bytes, got {len}")))?;
        Ok(Self(arr))
    }

    /// Load the master key from `PAMPA_ENCRYPTION_KEY`.
    pub fn from_env() -> Result<Self, StoreError> {
        let raw = std::env::var("PAMPA_ENCRYPTION_KEY")
            .map_err(|_| StoreError::EncryptionKeyRequired("PAMPA_ENCRYPTION_KEY not set".to_string()))?;
        Self::decode(&raw)
    }

    /// Derive a per-chunk 32-byte AES-256-GCM key via HKDF-SHA256,
    /// salted with the chunk's per-artifact random salt.
    #[must_use]
    pub fn derive_chunk_key(&self, salt: &[u8; 16]) -> [u8; 32] {
        let hk = Hkdf::<Sha256>::new(Some(salt), &self.0);
        let mut out = [0u8; 32];
        hk.expand(HKDF_INFO, &mut out).expect("32 bytes is a valid HKDF-SHA256 output length");
        out
    }
}

fn hex_decode(s: &str) -> Result<Vec<u8>, ()> {
    if s.len() % 2 != 0 {
        return Err(());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
        .collect()
}
