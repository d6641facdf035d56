//! Configuration loading for the sealing library.
//!
//! All values are read from environment variables at the moment of the
//! call. Nothing is cached, so a caller that rotates the external secret
//! between calls observes the new value on the very next resolution.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment-backed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SealConfig {
    /// The encryption key material, from `TOKEN_ENCRYPTION_KEY`. May be
    /// standard base64, hex, or 32 raw bytes. An absent variable behaves
    /// exactly like an empty one: emptiness is diagnosed at key
    /// resolution, not here, so boolean health probes stay non-raising.
    #[serde(default)]
    pub token_encryption_key: String,
}

impl SealConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment source cannot be built or
    /// deserialised.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        cfg.try_deserialize()
            .context("failed to deserialise configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_defaults_to_empty() {
        let cfg: SealConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(cfg.token_encryption_key.is_empty());
    }
}
