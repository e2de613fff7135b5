//! Envelope value types.
//!
//! - [`Payload`] - Text or JSON content of a signed envelope
//! - [`TokenKey`] - Shared secret for id tokens
//! - [`TokenClaims`] - The id/expiry pair bound into a token

mod payload;

#[cfg(feature = "token")]
mod claims;
#[cfg(feature = "token")]
mod token_key;

pub use payload::{Payload, JSON_TAG, TEXT_TAG};

#[cfg(feature = "token")]
pub use claims::{TokenClaims, CLAIMS_SIZE, NO_EXPIRY};
#[cfg(feature = "token")]
pub use token_key::{TokenKey, TOKEN_KEY_HEX_LEN, TOKEN_KEY_SIZE};
