//! Ergonomic layer for envelope operations.
//!
//! The prelude re-exports every operation and type, plus builders with
//! preset profiles for key pairs and id tokens.
//!
//! # Usage
//!
//! ```rust
//! use sealed_envelope::prelude::*;
//! ```

mod builders;

#[cfg(any(feature = "signer", feature = "sealer"))]
pub use builders::KeyPairBuilder;
#[cfg(feature = "token")]
pub use builders::TokenBuilder;

// Re-export core types for convenience
pub use crate::core::error::{EnvelopeError, EnvelopeResult};
pub use crate::core::types::Payload;

#[cfg(any(feature = "signer", feature = "sealer"))]
pub use crate::core::keys::{generate_key_pair, KeyPair};

#[cfg(feature = "signer")]
pub use crate::core::operations::sign::{sign, sign_serialize, verify};

#[cfg(feature = "sealer")]
pub use crate::core::operations::seal::{decrypt, encrypt};

#[cfg(feature = "token")]
pub use crate::core::operations::token::{
    decrypt_id, encrypt_id, encrypt_id_value, generate_token_key,
};
#[cfg(feature = "token")]
pub use crate::core::types::{TokenClaims, TokenKey};
