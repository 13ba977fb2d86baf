//! ChaCha20-Poly1305 payload cipher.
//!
//! Wire form is `nonce ‖ ciphertext` with a random 12-byte nonce per
//! message. The pipeline consumes this through the [`PayloadCipher`] seam
//! and never sees key material.

use chacha20poly1305::{
    aead::{Aead, NewAead},
    ChaCha20Poly1305, Key, Nonce,
};
use homelink_common::{CryptoError, PayloadCipher};
use rand::Rng;

/// Nonce length prefixed to every ciphertext.
const NONCE_LEN: usize = 12;
/// Required key length.
const KEY_LEN: usize = 32;

/// Symmetric payload cipher over a configured 32-byte key.
pub struct ChaChaPayloadCipher {
    cipher: ChaCha20Poly1305,
}

impl ChaChaPayloadCipher {
    /// Build a cipher from a hex-encoded 32-byte key.
    pub fn from_hex_key(hex_key: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_key)
            .map_err(|e| CryptoError::InvalidKey(format!("key is not hex: {e}")))?;
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(ChaChaPayloadCipher {
            cipher: ChaCha20Poly1305::new(Key::from_slice(&bytes)),
        })
    }
}

impl PayloadCipher for ChaChaPayloadCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.len() <= NONCE_LEN {
            return Err(CryptoError::Decrypt(format!(
                "payload too short: {} bytes",
                data.len()
            )));
        }
        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CryptoError::Decrypt(e.to_string()))
    }
}
