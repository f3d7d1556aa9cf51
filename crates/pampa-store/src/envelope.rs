//! Encrypted chunk envelope: gzip, then AES-256-GCM with an
//! HKDF-derived per-chunk key.
//!
//! Layout: `"PAMPAE1"` (7 bytes) ‖ salt (16 bytes) ‖ iv (12 bytes) ‖
//! ciphertext‖tag (`aes-gcm` appends the 16-byte tag to the ciphertext).

use crate::error::StoreError;
use crate::key::MasterKey;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use std::io::{Read, Write};

const MAGIC: &[u8; 7] = b"PAMPAE1";
const SALT_LEN: usize = 16;
const IV_LEN: usize = 12;

/// Gzip-compress UTF-8 source text.
pub fn gzip(code: &str) -> Result<Vec<u8>, StoreError> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(code.as_bytes())
        .map_err(|e| StoreError::Io { path: "<gzip>".to_string(), source: e })?;
    encoder.finish().map_err(|e| StoreError::Io { path: "<gzip>".to_string(), source: e })
}

/// Gunzip bytes back to UTF-8 source text.
pub fn gunzip(bytes: &[u8]) -> Result<String, StoreError> {
    let mut decoder = flate2::read::GzDecoder::new(bytes);
    let mut out = String::new();
    decoder
        .read_to_string(&mut out)
        .map_err(|e| StoreError::Io { path: "<gunzip>".to_string(), source: e })?;
    Ok(out)
}

/// Encrypt gzip-compressed code text into the PAMPA envelope format.
pub fn encrypt(code: &str, master_key: &MasterKey) -> Result<Vec<u8>, StoreError> {
    let compressed = gzip(code)?;

    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut salt);
    rand::rng().fill_bytes(&mut iv);

    let chunk_key = master_key.derive_chunk_key(&salt);
    let cipher = Aes256Gcm::new_from_slice(&chunk_key).expect("key is exactly 32 bytes");
    let nonce = Nonce::from_slice(&iv);
    let ciphertext = cipher
        .encrypt(nonce, compressed.as_slice())
        .map_err(|_| StoreError::EncryptionAuthFailed)?;

    let mut out = Vec::with_capacity(MAGIC.len() + SALT_LEN + IV_LEN + ciphertext.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a PAMPA envelope back to UTF-8 code text.
pub fn decrypt(envelope: &[u8], master_key: &MasterKey) -> Result<String, StoreError> {
    let header_len = MAGIC.len() + SALT_LEN + IV_LEN;
    if envelope.len() < MAGIC.len() || &envelope[..MAGIC.len()] != MAGIC {
        return Err(StoreError::EncryptionFormatUnrecognized);
    }
    if envelope.len() < header_len {
        return Err(StoreError::EncryptionPayloadInvalid(
            "envelope truncated before salt/iv".to_string(),
        ));
    }
    let salt: [u8; SALT_LEN] =
        envelope[MAGIC.len()..MAGIC.len() + SALT_LEN].try_into().expect("slice has SALT_LEN bytes");
    let iv_start = MAGIC.len() + SALT_LEN;
    let iv: [u8; IV_LEN] =
        envelope[iv_start..iv_start + IV_LEN].try_into().expect("slice has IV_LEN bytes");
    let ciphertext = &envelope[iv_start + IV_LEN..];

    let chunk_key = master_key.derive_chunk_key(&salt);
    let cipher = Aes256Gcm::new_from_slice(&chunk_key).expect("key is exactly 32 bytes");
    let nonce = Nonce::from_slice(&iv);
    let compressed = cipher.decrypt(nonce, ciphertext).map_err(|_| StoreError::EncryptionAuthFailed)?;
    gunzip(&compressed).map_err(|_| StoreError::EncryptionPayloadInvalid("corrupt gzip payload".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> MasterKey {
        MasterKey::decode(&"ab".repeat(32)).unwrap()
    }

    #[test]
    fn round_trips_plain_gzip() {
        let compressed = gzip("fn hello() {}").unwrap();
        assert_eq!(gunzip(&compressed).unwrap(), "fn hello() {}");
    }

    #[test]
    fn round_trips_encrypted_envelope() {
        let k = key();
        let envelope = encrypt("function secret() { return 1; }", &k).unwrap();
        assert_eq!(&envelope[..7], MAGIC);
        let decoded = decrypt(&envelope, &k).unwrap();
        assert_eq!(decoded, "function secret() { return 1; }");
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let envelope = encrypt("secret", &key()).unwrap();
        let wrong_key = MasterKey::decode(&"cd".repeat(32)).unwrap();
        assert!(matches!(decrypt(&envelope, &wrong_key), Err(StoreError::EncryptionAuthFailed)));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let k = key();
        assert!(matches!(decrypt(b"not an envelope", &k), Err(StoreError::EncryptionFormatUnrecognized)));
    }

    #[test]
    fn truncated_envelope_after_valid_magic_is_payload_invalid() {
        let k = key();
        let mut truncated = MAGIC.to_vec();
        truncated.extend_from_slice(&[0u8; 4]);
        assert!(matches!(decrypt(&truncated, &k), Err(StoreError::EncryptionPayloadInvalid(_))));
    }

    #[test]
    fn each_encryption_uses_a_fresh_salt_and_iv() {
        let k = key();
        let a = encrypt("same text", &k).unwrap();
        let b = encrypt("same text", &k).unwrap();
        assert_ne!(a, b, "salt/iv must be randomized per call");
    }
}
