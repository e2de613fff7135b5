//! Core envelope types and operations.
//!
//! - [`error`] - Error type shared by every operation
//! - [`keys`] - RSA key pair generation and PEM parsing
//! - [`types`] - Payloads, token keys and token claims
//! - [`operations`] - Sign/verify, encrypt/decrypt and id token codecs

pub mod error;
#[cfg(any(feature = "signer", feature = "sealer"))]
pub mod keys;
pub mod operations;
pub mod types;

pub use error::{EnvelopeError, EnvelopeResult};
