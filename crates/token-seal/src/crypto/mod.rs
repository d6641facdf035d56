//! AES-256-GCM-SIV envelope encryption of individual token values.
//!
//! This module is intentionally free of configuration and environment
//! dependencies. It provides the low-level encrypt/decrypt operations used
//! by the sealing facade at the crate root.
//!
//! # Envelope format
//!
//! ```text
//! [version: 1 byte = 0x01][nonce: 12 bytes][tag: 16 bytes][ciphertext: N bytes]
//! ```
//!
//! The leading version byte enables future algorithm or layout migration
//! without breaking envelopes already at rest: a new format gets a new
//! version value and its own decode branch, while version `1` keeps
//! decoding forever.

pub mod envelope;

pub use envelope::{HEADER_LEN, KEY_LEN, NONCE_LEN, TAG_LEN, VERSION};
