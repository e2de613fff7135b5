//! `TokenClaims` - The id and expiry bound into a token.

use serde::{Deserialize, Serialize};

/// Expiry value meaning "never expires".
pub const NO_EXPIRY: i64 = 0;

/// Size of the serialized claims (two big-endian `i64`).
pub const CLAIMS_SIZE: usize = 16;

/// The values carried by an id token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Caller-defined identifier.
    pub id: i64,
    /// Expiry in epoch milliseconds, [`NO_EXPIRY`] for none.
    pub exp: i64,
}

impl TokenClaims {
    /// Creates claims with an optional expiry.
    #[must_use]
    pub const fn new(id: i64, exp: Option<i64>) -> Self {
        let exp = match exp {
            Some(exp) => exp,
            None => NO_EXPIRY,
        };
        Self { id, exp }
    }

    /// Returns `true` if the claims have passed their expiry at `now_millis`.
    #[must_use]
    pub const fn is_expired_at(&self, now_millis: i64) -> bool {
        self.exp != NO_EXPIRY && self.exp < now_millis
    }

    pub(crate) fn to_bytes(self) -> [u8; CLAIMS_SIZE] {
        let mut out = [0u8; CLAIMS_SIZE];
        out[..8].copy_from_slice(&self.id.to_be_bytes());
        out[8..].copy_from_slice(&self.exp.to_be_bytes());
        out
    }

    pub(crate) fn from_bytes(bytes: &[u8; CLAIMS_SIZE]) -> Self {
        let mut id = [0u8; 8];
        let mut exp = [0u8; 8];
        id.copy_from_slice(&bytes[..8]);
        exp.copy_from_slice(&bytes[8..]);
        Self {
            id: i64::from_be_bytes(id),
            exp: i64::from_be_bytes(exp),
        }
    }
}
