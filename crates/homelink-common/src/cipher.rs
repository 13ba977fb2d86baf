//! The payload encryption capability.

use thiserror::Error;

/// Errors reported by a cipher backend.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The configured key material is unusable.
    #[error("invalid cipher key: {0}")]
    InvalidKey(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encrypt(String),

    /// Decryption or authentication failed.
    #[error("decryption failed: {0}")]
    Decrypt(String),
}

/// The encrypt/decrypt primitive protecting cloud payloads.
///
/// Consumed as an opaque capability: the pipeline never inspects key
/// material or wire framing, it only maps bytes to bytes. A decrypt
/// failure is handled at the router as an invalid signal.
pub trait PayloadCipher: Send + Sync {
    /// Encrypt a plaintext payload for transmission to the cloud.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt a payload received from the cloud.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}
