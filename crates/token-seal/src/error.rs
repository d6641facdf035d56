//! Crate-level error type aggregating the module-local failure taxonomies.

use thiserror::Error;

use crate::crypto::envelope::EnvelopeError;
use crate::key::KeyError;

/// Top-level error for the combined seal/unseal operations.
///
/// Module-local enums stay the precise source of truth; this aggregate
/// exists so facade callers can match one type and so log lines and
/// metrics can use a stable machine-readable [`kind`](SealError::kind).
#[derive(Debug, Error)]
pub enum SealError {
    /// Key resolution failed.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Envelope encryption or decryption failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl SealError {
    /// Short machine-readable code for this error, safe to log — no
    /// variant carries key material or plaintext.
    pub fn kind(&self) -> &'static str {
        match self {
            SealError::Key(KeyError::Missing) => "key_missing",
            SealError::Key(KeyError::Malformed) => "key_malformed",
            SealError::Envelope(EnvelopeError::EmptyPlaintext) => "empty_plaintext",
            SealError::Envelope(EnvelopeError::InvalidInput) => "input_invalid",
            SealError::Envelope(EnvelopeError::TooShort { .. }) => "input_too_short",
            SealError::Envelope(EnvelopeError::UnsupportedVersion(_)) => "unsupported_version",
            SealError::Envelope(EnvelopeError::AuthenticationFailed) => "authentication_failed",
            SealError::Envelope(EnvelopeError::DecodeFailed) => "decode_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(SealError::from(KeyError::Missing).kind(), "key_missing");
        assert_eq!(SealError::from(KeyError::Malformed).kind(), "key_malformed");
        assert_eq!(
            SealError::from(EnvelopeError::AuthenticationFailed).kind(),
            "authentication_failed"
        );
        assert_eq!(
            SealError::from(EnvelopeError::TooShort { len: 3 }).kind(),
            "input_too_short"
        );
    }

    #[test]
    fn display_passes_through_the_source_message() {
        let e = SealError::from(EnvelopeError::UnsupportedVersion(2));
        assert!(e.to_string().contains("unsupported envelope version: 2"));
    }
}
