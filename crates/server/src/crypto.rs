//! Reversible encryption for stored mail credentials.
//!
//! AES-256-GCM with a key derived from the configured secret (SHA-256).
//! Blobs are `base64(nonce ‖ ciphertext)`. Decryption failures yield `None`;
//! the notification path treats that as "no credentials" and skips dispatch.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct CredentialCipher {
    key: [u8; 32],
}

impl CredentialCipher {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        Self { key }
    }

    /// Encrypts a plaintext credential into the stored blob form.
    #[must_use]
    pub fn encrypt(&self, plaintext: &str) -> Option<String> {
        let cipher = Aes256Gcm::new_from_slice(&self.key).ok()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher.encrypt(&nonce, plaintext.as_bytes()).ok()?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Some(BASE64.encode(blob))
    }

    /// Decrypts a stored blob. Returns `None` on any malformed or tampered
    /// input; decrypted values must never be persisted.
    #[must_use]
    pub fn decrypt(&self, blob: &str) -> Option<String> {
        let raw = BASE64.decode(blob).ok()?;
        if raw.len() <= NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(&self.key).ok()?;
        let plaintext = cipher.decrypt(Nonce::from_slice(nonce), ciphertext).ok()?;
        String::from_utf8(plaintext).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let cipher = CredentialCipher::new("secret");
        let blob = cipher.encrypt("hunter2").unwrap();
        assert_eq!(cipher.decrypt(&blob).unwrap(), "hunter2");
    }

    #[test]
    fn wrong_key_fails_closed() {
        let blob = CredentialCipher::new("secret").encrypt("hunter2").unwrap();
        assert!(CredentialCipher::new("other").decrypt(&blob).is_none());
    }

    #[test]
    fn garbage_blob_fails_closed() {
        let cipher = CredentialCipher::new("secret");
        assert!(cipher.decrypt("not base64 at all!").is_none());
        assert!(cipher.decrypt("AAAA").is_none());
    }
}
