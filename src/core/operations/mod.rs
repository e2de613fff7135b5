//! Envelope operations.
//!
//! - [`sign`] - Signed-payload envelopes (RSA-PSS + SHA-256)
//! - [`seal`] - Hybrid-encryption envelopes (RSA-OAEP + ChaCha20)
//! - [`token`] - Compact id tokens (XChaCha20 + BLAKE2b)

#[cfg(feature = "signer")]
pub mod sign;

#[cfg(feature = "sealer")]
pub mod seal;

#[cfg(feature = "sealer")]
mod stream;

#[cfg(feature = "token")]
pub mod token;
