//! `token-seal` — authenticated-encryption envelope for API tokens at rest.
//!
//! Applications hold third-party API tokens that must live in a datastore
//! column without ever being stored in plaintext. This crate defines the
//! whole of that contract and nothing else:
//!
//! - [`key`] resolves a single 256-bit key from the process environment,
//!   accepting base64, hex, or raw-byte encodings.
//! - [`crypto`] encrypts a token into a self-describing versioned binary
//!   envelope (AES-256-GCM-SIV, random nonce, embedded tag) and reverses
//!   the operation, rejecting truncated, tampered, or unknown-version
//!   blobs.
//! - [`mask`] redacts a token for operator display without touching the
//!   key.
//!
//! Every operation is synchronous and stateless; the only side effects are
//! reading environment variables and consuming OS entropy for nonces, so
//! all calls are safe from any number of threads without locking. Storage
//! transactions around the resulting bytes are the caller's concern.

pub mod config;
pub mod crypto;
pub mod error;
pub mod key;
pub mod mask;

pub use config::SealConfig;
pub use crypto::envelope::{
    decrypt, decrypt_armored, encrypt, encrypt_armored, EnvelopeError,
};
pub use error::SealError;
pub use key::{has_valid_key, KeyError, KeyMaterial};
pub use mask::{mask, REDACTION_MARKER};

/// Encrypt a token under the key currently in the environment.
///
/// Resolves the key fresh (no caching — a rotated `TOKEN_ENCRYPTION_KEY`
/// is picked up immediately) and returns the binary envelope to persist.
///
/// # Errors
///
/// Any [`KeyError`] from resolution or [`EnvelopeError`] from encryption.
pub fn seal(plaintext: Option<&str>) -> Result<Vec<u8>, SealError> {
    let key = KeyMaterial::from_env()?;
    Ok(crypto::envelope::encrypt(plaintext, &key)?)
}

/// Decrypt a stored envelope under the key currently in the environment.
///
/// # Errors
///
/// Any [`KeyError`] from resolution or [`EnvelopeError`] from decryption.
pub fn unseal(envelope: &[u8]) -> Result<String, SealError> {
    let key = KeyMaterial::from_env()?;
    Ok(crypto::envelope::decrypt(envelope, &key)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-dependent assertions live in this single test so that
    // parallel test threads never race on `TOKEN_ENCRYPTION_KEY`.
    #[test]
    fn facade_round_trips_with_an_environment_key() {
        std::env::set_var("TOKEN_ENCRYPTION_KEY", "0".repeat(64));
        assert!(has_valid_key());

        let envelope = seal(Some("hello-token-123")).unwrap();
        assert_eq!(envelope.len(), 44);
        assert_eq!(envelope[0], 1);
        assert_eq!(unseal(&envelope).unwrap(), "hello-token-123");

        assert_eq!(mask(Some("hello-token-123")), "hell********-123");
    }
}
