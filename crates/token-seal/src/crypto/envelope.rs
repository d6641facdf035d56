//! Binary envelope codec: AES-256-GCM-SIV over one token value.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) keeps its guarantees
//! even if a nonce were ever repeated, the right default for envelopes that
//! sit in a datastore for years. Every call still draws a fresh random
//! nonce from the OS CSPRNG, so two encryptions of the same plaintext under
//! the same key never produce the same envelope.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, OsRng},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use thiserror::Error;

use crate::key::KeyMaterial;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Envelope format version written as the first byte of every envelope.
pub const VERSION: u8 = 1;

/// Minimum envelope length: version byte + nonce + tag. An empty plaintext
/// encrypts to an envelope of exactly this length.
pub const HEADER_LEN: usize = 1 + NONCE_LEN + TAG_LEN;

/// Errors produced by the envelope codec.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// No plaintext value was supplied (a NULL column or absent field).
    /// An empty string is a valid plaintext and is not this error.
    #[error("no plaintext value was supplied")]
    EmptyPlaintext,

    /// The stored value could not be decoded into an envelope byte sequence.
    #[error("stored value is not a valid envelope encoding")]
    InvalidInput,

    /// The byte sequence is shorter than the fixed envelope header.
    #[error("envelope is {len} bytes, shorter than the {HEADER_LEN}-byte minimum")]
    TooShort {
        /// Actual length of the rejected input.
        len: usize,
    },

    /// The version byte names a format this codec does not know.
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    /// The authentication tag did not verify. Covers corruption, truncated
    /// ciphertext, and wrong-key attempts uniformly.
    #[error("envelope authentication failed")]
    AuthenticationFailed,

    /// The decrypted bytes were not valid UTF-8. Carries no payload so the
    /// decrypted bytes cannot escape through an error message.
    #[error("decrypted bytes are not valid UTF-8")]
    DecodeFailed,
}

/// Encrypt a token value into a self-describing binary envelope.
///
/// A random 96-bit nonce is generated per call via the OS CSPRNG, so the
/// output differs between calls even for identical inputs. No associated
/// data is bound into the tag beyond the ciphertext itself.
///
/// `plaintext` is optional at the call site because token values arrive
/// from nullable storage and request fields: `None` is rejected, while
/// `Some("")` encrypts normally to a [`HEADER_LEN`]-byte envelope.
///
/// # Errors
///
/// Returns [`EnvelopeError::EmptyPlaintext`] if `plaintext` is `None`.
/// Returns [`EnvelopeError::AuthenticationFailed`] on an internal AEAD error
/// (unreachable with a well-formed [`KeyMaterial`]).
pub fn encrypt(plaintext: Option<&str>, key: &KeyMaterial) -> Result<Vec<u8>, EnvelopeError> {
    let plaintext = plaintext.ok_or(EnvelopeError::EmptyPlaintext)?;
    let cipher = Aes256GcmSiv::new(key.as_bytes().into());

    // Use OsRng for a cryptographically secure random nonce.
    use aes_gcm_siv::aead::rand_core::RngCore;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    // The AEAD implementation returns ciphertext with the tag appended;
    // the envelope layout stores the tag before the ciphertext.
    let ct_and_tag = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| EnvelopeError::AuthenticationFailed)?;
    let tag_start = ct_and_tag.len() - TAG_LEN;

    let mut envelope = Vec::with_capacity(HEADER_LEN + tag_start);
    envelope.push(VERSION);
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ct_and_tag[tag_start..]);
    envelope.extend_from_slice(&ct_and_tag[..tag_start]);
    Ok(envelope)
}

/// Decrypt a binary envelope back into the token value.
///
/// The version byte is checked before any decryption attempt; it is the
/// extension point for future envelope formats.
///
/// # Errors
///
/// Returns [`EnvelopeError::TooShort`] if the input is shorter than
/// [`HEADER_LEN`] bytes, [`EnvelopeError::UnsupportedVersion`] if the
/// version byte is not [`VERSION`], [`EnvelopeError::AuthenticationFailed`]
/// if the tag does not verify (tampered data or wrong key), and
/// [`EnvelopeError::DecodeFailed`] if the decrypted bytes are not UTF-8.
pub fn decrypt(envelope: &[u8], key: &KeyMaterial) -> Result<String, EnvelopeError> {
    if envelope.len() < HEADER_LEN {
        return Err(EnvelopeError::TooShort {
            len: envelope.len(),
        });
    }
    let version = envelope[0];
    if version != VERSION {
        return Err(EnvelopeError::UnsupportedVersion(version));
    }

    let nonce = Nonce::from_slice(&envelope[1..1 + NONCE_LEN]);
    let tag = &envelope[1 + NONCE_LEN..HEADER_LEN];
    let ciphertext = &envelope[HEADER_LEN..];

    // Reassemble the ciphertext-then-tag ordering the AEAD expects.
    let mut ct_and_tag = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    ct_and_tag.extend_from_slice(ciphertext);
    ct_and_tag.extend_from_slice(tag);

    let cipher = Aes256GcmSiv::new(key.as_bytes().into());
    let plaintext = cipher
        .decrypt(nonce, ct_and_tag.as_ref())
        .map_err(|_| EnvelopeError::AuthenticationFailed)?;

    String::from_utf8(plaintext).map_err(|_| EnvelopeError::DecodeFailed)
}

/// Encrypt a token value and armor the envelope as base64url-no-pad, for
/// callers whose datastore column is text rather than binary.
///
/// # Errors
///
/// Same failure cases as [`encrypt`].
pub fn encrypt_armored(
    plaintext: Option<&str>,
    key: &KeyMaterial,
) -> Result<String, EnvelopeError> {
    Ok(URL_SAFE_NO_PAD.encode(encrypt(plaintext, key)?))
}

/// De-armor and decrypt a value produced by [`encrypt_armored`].
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidInput`] if `armored` is not valid
/// base64url-no-pad; otherwise the failure cases of [`decrypt`].
pub fn decrypt_armored(armored: &str, key: &KeyMaterial) -> Result<String, EnvelopeError> {
    let envelope = URL_SAFE_NO_PAD
        .decode(armored)
        .map_err(|_| EnvelopeError::InvalidInput)?;
    decrypt(&envelope, key)
}
