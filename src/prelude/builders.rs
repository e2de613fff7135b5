//! Builder patterns for key pairs and id tokens.
//!
//! # Key Pair Profiles
//!
//! | Profile | Modulus | Envelope overhead |
//! |---------|---------|-------------------|
//! | `standard()` | 2048 bits | 256 bytes (default) |
//! | `high()` | 4096 bits | 512 bytes |
//!
//! # Example
//!
//! ```rust
//! use sealed_envelope::prelude::*;
//! use std::time::Duration;
//!
//! let pair = KeyPairBuilder::standard().try_generate()?;
//! assert!(pair.public_key.starts_with("-----BEGIN RSA PUBLIC KEY-----"));
//!
//! let key = generate_token_key()?;
//! let token = TokenBuilder::new(22334)
//!     .expires_in(Duration::from_secs(300))
//!     .try_encrypt(&key)?;
//! assert_eq!(decrypt_id(&key, &token)?.id, 22334);
//! # Ok::<(), EnvelopeError>(())
//! ```

#[cfg(any(feature = "signer", feature = "sealer"))]
use crate::core::keys::{generate_key_pair_with_bits, KeyPair, DEFAULT_MODULUS_BITS};

#[cfg(feature = "token")]
use core::time::Duration;

#[cfg(feature = "token")]
use crate::core::error::{EnvelopeError, EnvelopeResult};
#[cfg(feature = "token")]
use crate::core::operations::token::{encrypt_claims, now_millis};
#[cfg(feature = "token")]
use crate::core::types::{TokenClaims, TokenKey};

#[cfg(all(
    any(feature = "signer", feature = "sealer"),
    not(feature = "token")
))]
use crate::core::error::EnvelopeResult;

/// Builder for RSA key pairs.
#[cfg(any(feature = "signer", feature = "sealer"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPairBuilder {
    bits: usize,
}

#[cfg(any(feature = "signer", feature = "sealer"))]
impl Default for KeyPairBuilder {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(any(feature = "signer", feature = "sealer"))]
impl KeyPairBuilder {
    /// Creates a builder with the standard profile.
    #[must_use]
    pub const fn new() -> Self {
        Self::standard()
    }

    /// Standard profile: 2048-bit modulus, 256-byte signatures and
    /// wrapped keys.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            bits: DEFAULT_MODULUS_BITS,
        }
    }

    /// High profile: 4096-bit modulus. Slower to generate and use, and
    /// adds 512 bytes to every envelope.
    #[must_use]
    pub const fn high() -> Self {
        Self { bits: 4096 }
    }

    /// Sets the modulus size in bits.
    #[must_use]
    pub const fn bits(mut self, bits: usize) -> Self {
        self.bits = bits;
        self
    }

    /// Returns the configured modulus size in bits.
    #[must_use]
    pub const fn modulus_bits(&self) -> usize {
        self.bits
    }

    /// Generates a key pair with the configured parameters.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::InvalidKey` if the modulus is below 2048 bits,
    /// or `EnvelopeError::CryptoError` if generation fails.
    pub fn try_generate(&self) -> EnvelopeResult<KeyPair> {
        generate_key_pair_with_bits(self.bits)
    }
}

#[cfg(feature = "token")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expiry {
    Never,
    At(i64),
    In(Duration),
}

/// Builder for id tokens.
///
/// Relative expiries are resolved against the clock when the token is
/// encrypted, not when the builder is created.
#[cfg(feature = "token")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBuilder {
    id: i64,
    expiry: Expiry,
}

#[cfg(feature = "token")]
impl TokenBuilder {
    /// Creates a builder for a token that never expires.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            expiry: Expiry::Never,
        }
    }

    /// Expires the token at an absolute time in epoch milliseconds.
    #[must_use]
    pub const fn expires_at(mut self, exp_millis: i64) -> Self {
        self.expiry = Expiry::At(exp_millis);
        self
    }

    /// Expires the token `ttl` after it is encrypted.
    #[must_use]
    pub const fn expires_in(mut self, ttl: Duration) -> Self {
        self.expiry = Expiry::In(ttl);
        self
    }

    /// Removes any configured expiry.
    #[must_use]
    pub const fn never_expires(mut self) -> Self {
        self.expiry = Expiry::Never;
        self
    }

    fn claims_at(&self, now_millis: i64) -> EnvelopeResult<TokenClaims> {
        let exp = match self.expiry {
            Expiry::Never => None,
            Expiry::At(exp) => Some(exp),
            Expiry::In(ttl) => {
                let ttl = i64::try_from(ttl.as_millis()).map_err(|_| EnvelopeError::InvalidExpiry)?;
                Some(
                    now_millis
                        .checked_add(ttl)
                        .ok_or(EnvelopeError::InvalidExpiry)?,
                )
            }
        };
        Ok(TokenClaims::new(self.id, exp))
    }

    /// Encrypts the token under a hex token key.
    ///
    /// # Errors
    ///
    /// - `EnvelopeError::InvalidKeySize` if `token_key` is not 64 hex characters
    /// - `EnvelopeError::InvalidExpiry` if a relative expiry overflows
    pub fn try_encrypt(&self, token_key: &str) -> EnvelopeResult<String> {
        let key = TokenKey::try_from(token_key)?;
        self.try_encrypt_with_key(&key)
    }

    /// Encrypts the token under a parsed token key.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::InvalidExpiry` if a relative expiry overflows.
    pub fn try_encrypt_with_key(&self, key: &TokenKey) -> EnvelopeResult<String> {
        let claims = self.claims_at(now_millis())?;
        encrypt_claims(key, claims)
    }
}
