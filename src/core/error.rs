//! Error types for envelope operations.
//!
//! This module provides a unified error type for the signer, sealer and
//! token codec. Messages for integrity failures are intentionally vague so
//! that callers cannot be used as an oracle (a wrong key and a corrupted
//! envelope report the same error).

use thiserror::Error;

/// Errors that can occur when producing or opening an envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope is not valid base64, is shorter than its fixed-size
    /// header, or carries an unknown type tag.
    #[error("Malformed envelope")]
    MalformedEnvelope,

    /// Signature verification failed (tampered data or wrong public key).
    /// Intentionally vague for security.
    #[error("Verify failed")]
    SignatureInvalid,

    /// The authenticated payload could not be decoded as its tagged type.
    #[error("Error decoding signed data")]
    PayloadDecode,

    /// A caller-supplied value could not be serialized to JSON.
    #[error("Error encoding payload: {0}")]
    PayloadEncode(#[source] serde_json::Error),

    /// The wrapped symmetric key could not be recovered.
    /// Intentionally vague for security.
    #[error("Decrypt failed")]
    UnwrapFailed,

    /// The RSA key could not be parsed or has an unsupported modulus.
    #[error("Invalid key material")]
    InvalidKey,

    /// The token key is not the required length.
    #[error("Invalid tokenKey size, expected {expected} hex characters")]
    InvalidKeySize {
        /// Required length in characters.
        expected: usize,
    },

    /// The token id is not an integer.
    #[error("id must be an integer")]
    InvalidId,

    /// The token expiry is not an integer.
    #[error("exp must be an integer")]
    InvalidExpiry,

    /// The token could not be decoded or failed authentication.
    #[error("Malformed token")]
    MalformedToken,

    /// The token authenticated but its expiry has passed.
    #[error("Expired token.")]
    TokenExpired,

    /// Generic cryptographic error (RNG or primitive failure).
    /// Intentionally vague for security.
    #[error("Cryptographic operation failed")]
    CryptoError,
}

/// Result type alias for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(EnvelopeError::MalformedEnvelope.to_string(), "Malformed envelope");
        assert_eq!(EnvelopeError::SignatureInvalid.to_string(), "Verify failed");
        assert_eq!(
            EnvelopeError::PayloadDecode.to_string(),
            "Error decoding signed data"
        );
        assert_eq!(EnvelopeError::UnwrapFailed.to_string(), "Decrypt failed");
        assert_eq!(EnvelopeError::InvalidKey.to_string(), "Invalid key material");
        assert_eq!(
            EnvelopeError::InvalidKeySize { expected: 64 }.to_string(),
            "Invalid tokenKey size, expected 64 hex characters"
        );
        assert_eq!(EnvelopeError::InvalidId.to_string(), "id must be an integer");
        assert_eq!(EnvelopeError::InvalidExpiry.to_string(), "exp must be an integer");
        assert_eq!(EnvelopeError::MalformedToken.to_string(), "Malformed token");
        assert_eq!(EnvelopeError::TokenExpired.to_string(), "Expired token.");
        assert_eq!(
            EnvelopeError::CryptoError.to_string(),
            "Cryptographic operation failed"
        );
    }

    #[test]
    fn test_payload_encode_keeps_source() {
        use std::error::Error as _;

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = EnvelopeError::PayloadEncode(json_err);
        assert!(err.to_string().starts_with("Error encoding payload"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_debug() {
        let err = EnvelopeError::UnwrapFailed;
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("UnwrapFailed"));
    }
}
