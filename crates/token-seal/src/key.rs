//! Key material resolution from the process environment.
//!
//! The 256-bit encryption key arrives as a single external string value and
//! may be supplied in any of three encodings. Resolution is attempted in a
//! fixed order — standard base64, then hex, then the raw UTF-8 bytes — and
//! the first attempt that yields exactly [`KEY_LEN`] bytes wins. The order
//! matters: a raw 32-character secret can also be well-formed base64 of the
//! wrong decoded length, and must still resolve deterministically.
//!
//! # Security invariants
//!
//! - Resolved key bytes are **never** written to disk, logged, or included
//!   in error messages.
//! - Nothing is cached: every resolution re-reads the environment, so a
//!   rotated secret is observed immediately with no invalidation step.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::warn;

use crate::config::SealConfig;
use crate::crypto::KEY_LEN;

/// Errors produced by key resolution.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The encryption key is absent from the environment, or set to the
    /// empty string.
    #[error("token encryption key is not configured")]
    Missing,

    /// The configured value does not decode to exactly [`KEY_LEN`] bytes
    /// under any supported encoding.
    #[error("token encryption key does not decode to exactly {KEY_LEN} bytes")]
    Malformed,
}

/// Fixed-size buffer holding exactly [`KEY_LEN`] bytes of key material.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
#[derive(Clone)]
pub struct KeyMaterial(Box<[u8; KEY_LEN]>);

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("KeyMaterial([REDACTED])")
    }
}

impl KeyMaterial {
    /// Resolve key material from an externally supplied string value.
    ///
    /// Decoding attempts, in order, first match wins:
    /// 1. standard base64, accepted iff it decodes to [`KEY_LEN`] bytes;
    /// 2. hex, accepted iff it decodes to [`KEY_LEN`] bytes;
    /// 3. the raw UTF-8 bytes of `raw`, accepted iff exactly [`KEY_LEN`]
    ///    bytes long.
    ///
    /// No truncation or padding is ever applied.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Missing`] if `raw` is empty and
    /// [`KeyError::Malformed`] if no decoding yields [`KEY_LEN`] bytes.
    pub fn resolve(raw: &str) -> Result<Self, KeyError> {
        if raw.is_empty() {
            return Err(KeyError::Missing);
        }
        if let Ok(decoded) = STANDARD.decode(raw) {
            if decoded.len() == KEY_LEN {
                return Ok(Self::from_slice(&decoded));
            }
        }
        if let Ok(decoded) = hex::decode(raw) {
            if decoded.len() == KEY_LEN {
                return Ok(Self::from_slice(&decoded));
            }
        }
        if raw.len() == KEY_LEN {
            return Ok(Self::from_slice(raw.as_bytes()));
        }
        Err(KeyError::Malformed)
    }

    /// Resolve key material from the current process environment.
    ///
    /// A fresh [`SealConfig`] is built on every call; there is no cached
    /// key, so rotating `TOKEN_ENCRYPTION_KEY` between calls takes effect
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Missing`] if the variable is absent, empty, or
    /// the environment cannot be read, and [`KeyError::Malformed`] if the
    /// value does not decode to [`KEY_LEN`] bytes.
    pub fn from_env() -> Result<Self, KeyError> {
        let cfg = SealConfig::from_env().map_err(|_| KeyError::Missing)?;
        Self::resolve(&cfg.token_encryption_key)
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Self(buf)
    }
}

/// Report whether the environment currently holds a usable encryption key.
///
/// Performs a full resolution and discards the outcome, for health-check
/// style callers. Deliberately boolean-only: the result does not reveal
/// which decoding path failed, and neither does the single `warn!` emitted
/// on failure.
pub fn has_valid_key() -> bool {
    match KeyMaterial::from_env() {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "token encryption key failed resolution");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_hex_and_raw_resolve_to_the_same_bytes() {
        let raw = "0123456789abcdefghijklmnopqrstuv";
        assert_eq!(raw.len(), KEY_LEN);
        let from_raw = KeyMaterial::resolve(raw).unwrap();
        let from_b64 = KeyMaterial::resolve(&STANDARD.encode(raw.as_bytes())).unwrap();
        let from_hex = KeyMaterial::resolve(&hex::encode(raw.as_bytes())).unwrap();
        assert_eq!(from_raw.as_bytes(), from_b64.as_bytes());
        assert_eq!(from_raw.as_bytes(), from_hex.as_bytes());
    }

    #[test]
    fn empty_value_is_missing() {
        assert!(matches!(KeyMaterial::resolve(""), Err(KeyError::Missing)));
    }

    #[test]
    fn wrong_length_rejected_in_every_encoding() {
        for len in [31usize, 33] {
            let bytes = vec![0x42u8; len];
            assert!(matches!(
                KeyMaterial::resolve(&STANDARD.encode(&bytes)),
                Err(KeyError::Malformed)
            ));
            assert!(matches!(
                KeyMaterial::resolve(&hex::encode(&bytes)),
                Err(KeyError::Malformed)
            ));
            assert!(matches!(
                KeyMaterial::resolve(&"x".repeat(len)),
                Err(KeyError::Malformed)
            ));
        }
    }

    #[test]
    fn all_zero_hex_key_decodes() {
        let key = KeyMaterial::resolve(&"0".repeat(64)).unwrap();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn raw_value_that_is_also_base64_resolves_as_raw_bytes() {
        // 32 ASCII characters form valid base64 (decoding to 24 bytes) but
        // must resolve through the raw-bytes fallback.
        let raw = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        assert_eq!(raw.len(), KEY_LEN);
        let key = KeyMaterial::resolve(raw).unwrap();
        assert_eq!(key.as_bytes(), raw.as_bytes());
    }

    #[test]
    fn key_material_redacted_in_debug() {
        let key = KeyMaterial::resolve(&"f".repeat(64)).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains('f'));
    }

    #[test]
    fn errors_never_echo_the_raw_value() {
        let err = KeyMaterial::resolve("super-secret-but-wrong-size").unwrap_err();
        assert!(!err.to_string().contains("super-secret"));
    }
}
