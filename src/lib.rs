//! Signed, sealed and token envelopes.
//!
//! This crate provides three small envelope formats, each a stateless
//! encode/decode pair taking explicit key material:
//!
//! | Component | Encode | Decode | Primitives |
//! |-----------|--------|--------|------------|
//! | Signer | [`sign`] | [`verify`] | RSA-PSS, SHA-256 |
//! | Sealer | [`encrypt`] | [`decrypt`] | RSA-OAEP, ChaCha20 |
//! | Token codec | [`encrypt_id`] | [`decrypt_id`] | XChaCha20, BLAKE2b |
//!
//! # Quick Start
//!
//! ```rust
//! use sealed_envelope::{decrypt, encrypt, generate_key_pair, sign, verify};
//! use serde_json::json;
//!
//! let pair = generate_key_pair()?;
//!
//! // Signed envelope carrying a JSON payload
//! let signed = sign(json!({"a": 1}), &pair.private_key)?;
//! let payload = verify(&signed, &pair.public_key)?;
//! assert_eq!(payload.as_json(), Some(&json!({"a": 1})));
//!
//! // Hybrid-encrypted string
//! let sealed = encrypt("wawa", &pair.public_key)?;
//! assert_eq!(decrypt(&sealed, &pair.private_key)?, "wawa");
//! # Ok::<(), sealed_envelope::EnvelopeError>(())
//! ```
//!
//! # Wire Formats
//!
//! - Signed: `base64(signature || payload || tag)`, tag `s` (text) or `j` (JSON)
//! - Sealed: `base64(rsa_oaep(key || iv) || chacha20(payload))`
//! - Token: `base64url(nonce || xchacha20(id || exp) || blake2b_tag)`
//!
//! Signed and sealed envelopes interoperate with implementations using
//! OpenSSL's RSA-PSS (maximum salt when signing, any salt when verifying),
//! RSA-OAEP (SHA-1) and `chacha20` cipher.
//!
//! # Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `signer` | yes | [`sign`], [`verify`] |
//! | `sealer` | yes | [`encrypt`], [`decrypt`] |
//! | `token` | yes | [`encrypt_id`], [`decrypt_id`] |
//! | `prelude` | yes | [`prelude`] builders |
//!
//! # Security
//!
//! - Integrity failures are reported with deliberately vague errors
//! - Symmetric key material is zeroized on drop
//! - Sealed envelopes carry no integrity tag on the ciphertext; sign them
//!   when tampering matters
//! - The `rsa` crate is affected by [RUSTSEC-2023-0071] (Marvin Attack), a
//!   timing side channel on private-key operations
//!
//! [RUSTSEC-2023-0071]: https://rustsec.org/advisories/RUSTSEC-2023-0071

pub mod core;

#[cfg(feature = "prelude")]
pub mod prelude;

// Re-export commonly used items at crate root
pub use crate::core::error::{EnvelopeError, EnvelopeResult};
pub use crate::core::types::Payload;

#[cfg(any(feature = "signer", feature = "sealer"))]
pub use crate::core::keys::{generate_key_pair, generate_key_pair_with_bits, KeyPair};

#[cfg(feature = "signer")]
pub use crate::core::operations::sign::{sign, sign_serialize, sign_with_key, verify, verify_with_key};

#[cfg(feature = "sealer")]
pub use crate::core::operations::seal::{decrypt, decrypt_with_key, encrypt, encrypt_with_key};

#[cfg(feature = "token")]
pub use crate::core::operations::token::{
    decrypt_claims, decrypt_id, decrypt_id_at, encrypt_claims, encrypt_id, encrypt_id_value,
    generate_token_key,
};

#[cfg(feature = "token")]
pub use crate::core::types::{TokenClaims, TokenKey};
