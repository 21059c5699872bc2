//! Authenticated symmetric encryption used to mint and validate API keys.
//!
//! A single 256-bit key is loaded once at process start. `encrypt` and
//! `decrypt` are the only entry points; there is no key rotation support.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

const NONCE_LEN: usize = 12; // 96-bit nonce, as required by AES-GCM.
const TAG_LEN: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("malformed base64 token")]
    MalformedToken,

    #[error("token too short to contain a nonce and tag")]
    TooShort,

    #[error("authentication failed: token was tampered with or minted under a different key")]
    AuthenticationFailed,

    #[error("key must be exactly 32 bytes, got {0}")]
    InvalidKeyLength(usize),
}

/// Holds the process-wide AEAD key. Read-only after construction.
#[derive(Clone)]
pub struct Crypto {
    cipher: Aes256Gcm,
}

impl Crypto {
    /// Build from a raw 32-byte key (e.g. loaded from `AES_SECRET_KEY`).
    pub fn new(key_bytes: &[u8]) -> Result<Self, CryptoError> {
        if key_bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength(key_bytes.len()));
        }
        let key = Key::<Aes256Gcm>::from_slice(key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Encrypt `plaintext`, returning `base64(nonce || ciphertext || tag)`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::AuthenticationFailed)?;

        let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(token))
    }

    /// Decrypt a token produced by [`Crypto::encrypt`]. The AEAD tag check
    /// (performed inside `aes-gcm`) is constant-time with respect to the
    /// presented tag, so malformed and forged tokens fail identically.
    pub fn decrypt(&self, token: &str) -> Result<String, CryptoError> {
        let raw = BASE64
            .decode(token)
            .map_err(|_| CryptoError::MalformedToken)?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::TooShort);
        }

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = aes_gcm::Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> Crypto {
        Crypto::new(&[byte; 32]).unwrap()
    }

    #[test]
    fn round_trips_for_any_plaintext() {
        let c = key(1);
        for plaintext in ["", "a", "app:server", "unicode-✓-string"] {
            let token = c.encrypt(plaintext).unwrap();
            assert_eq!(c.decrypt(&token).unwrap(), plaintext);
        }
    }

    #[test]
    fn rejects_token_minted_under_a_different_key() {
        let a = key(1);
        let b = key(2);
        let token = a.encrypt("app:server").unwrap();
        assert_eq!(b.decrypt(&token), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn rejects_malformed_base64() {
        let c = key(1);
        assert_eq!(c.decrypt("not base64!!"), Err(CryptoError::MalformedToken));
    }

    #[test]
    fn rejects_short_input() {
        let c = key(1);
        let short = BASE64.encode([0u8; 4]);
        assert_eq!(c.decrypt(&short), Err(CryptoError::TooShort));
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let c = key(1);
        let token = c.encrypt("app:server").unwrap();
        let mut raw = BASE64.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        let tampered = BASE64.encode(raw);
        assert_eq!(c.decrypt(&tampered), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn rejects_wrong_key_length() {
        let err = Crypto::new(&[0u8; 16]).unwrap_err();
        assert_eq!(err, CryptoError::InvalidKeyLength(16));
    }
}
