//! `TokenKey` - Shared secret for id tokens.
//!
//! Format: 64 lowercase or uppercase hex characters (32 bytes).

use core::fmt::{self, Debug, Display};

use rand_core::{OsRng, RngCore};
use zeroize::Zeroize;

use crate::core::error::{EnvelopeError, EnvelopeResult};

/// Size of the token key in bytes.
pub const TOKEN_KEY_SIZE: usize = 32;

/// Size of the token key in hex characters.
pub const TOKEN_KEY_HEX_LEN: usize = TOKEN_KEY_SIZE * 2;

/// A symmetric token key.
///
/// # Security
///
/// - Key material is zeroized on drop
/// - Debug output redacts the key
/// - Equality comparison uses constant-time comparison
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct TokenKey {
    key: [u8; TOKEN_KEY_SIZE],
}

impl TokenKey {
    /// Creates a `TokenKey` from raw bytes.
    #[must_use]
    pub const fn new(key: [u8; TOKEN_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Draws a fresh key from the OS random source.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::CryptoError` if the random source fails.
    pub fn generate() -> EnvelopeResult<Self> {
        let mut key = [0u8; TOKEN_KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|_| EnvelopeError::CryptoError)?;
        Ok(Self::new(key))
    }

    /// Returns a reference to the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; TOKEN_KEY_SIZE] {
        &self.key
    }
}

impl From<[u8; TOKEN_KEY_SIZE]> for TokenKey {
    fn from(key: [u8; TOKEN_KEY_SIZE]) -> Self {
        Self::new(key)
    }
}

impl Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.key))
    }
}

impl Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TryFrom<&str> for TokenKey {
    type Error = EnvelopeError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        let size_error = EnvelopeError::InvalidKeySize {
            expected: TOKEN_KEY_HEX_LEN,
        };

        if text.len() != TOKEN_KEY_HEX_LEN {
            return Err(size_error);
        }

        let mut key = [0u8; TOKEN_KEY_SIZE];
        hex::decode_to_slice(text, &mut key).map_err(|_| size_error)?;
        Ok(Self::new(key))
    }
}

impl PartialEq for TokenKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.key.ct_eq(&other.key).into()
    }
}

impl Eq for TokenKey {}
