//! Hybrid-encryption envelopes.
//!
//! Format: `base64(wrapped_key || ciphertext)`
//!
//! - `wrapped_key` - RSA-OAEP (SHA-1, MGF1-SHA-1) encryption of
//!   `stream_key (32) || iv (16)`, modulus-length bytes (256 for RSA-2048)
//! - `ciphertext` - ChaCha20 encryption of the UTF-8 payload
//!
//! Only the 48-byte key and IV go through RSA, so the asymmetric cost is
//! constant regardless of payload size.
//!
//! # Security
//!
//! The ciphertext carries no authentication tag. Modifying it while leaving
//! `wrapped_key` intact yields garbled plaintext rather than an error. Pair
//! with a signed envelope when integrity matters.

use base64::prelude::*;
use rand_core::{OsRng, RngCore};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use zeroize::{Zeroize, Zeroizing};

use crate::core::error::{EnvelopeError, EnvelopeResult};
use crate::core::keys::{parse_private_key, parse_public_key};
use crate::core::operations::stream::{apply_keystream, STREAM_IV_SIZE, STREAM_KEY_SIZE};

/// Size of the secret wrapped by RSA (stream key + IV).
pub const WRAPPED_SECRET_SIZE: usize = STREAM_KEY_SIZE + STREAM_IV_SIZE;

#[derive(Zeroize)]
#[zeroize(drop)]
struct StreamSecret {
    key: [u8; STREAM_KEY_SIZE],
    iv: [u8; STREAM_IV_SIZE],
}

fn split_secret(secret: &[u8]) -> EnvelopeResult<StreamSecret> {
    if secret.len() != WRAPPED_SECRET_SIZE {
        return Err(EnvelopeError::UnwrapFailed);
    }
    let mut parts = StreamSecret {
        key: [0u8; STREAM_KEY_SIZE],
        iv: [0u8; STREAM_IV_SIZE],
    };
    parts.key.copy_from_slice(&secret[..STREAM_KEY_SIZE]);
    parts.iv.copy_from_slice(&secret[STREAM_KEY_SIZE..]);
    Ok(parts)
}

/// Encrypts a string for the holder of the private key matching a
/// PEM-encoded RSA public key.
///
/// # Errors
///
/// Returns `EnvelopeError::InvalidKey` if the PEM cannot be parsed, or
/// `EnvelopeError::CryptoError` if randomness or encryption fails.
///
/// # Example
///
/// ```rust
/// use sealed_envelope::{decrypt, encrypt, generate_key_pair};
///
/// let pair = generate_key_pair()?;
/// let envelope = encrypt("wawa", &pair.public_key)?;
/// assert_eq!(decrypt(&envelope, &pair.private_key)?, "wawa");
/// # Ok::<(), sealed_envelope::EnvelopeError>(())
/// ```
pub fn encrypt(payload: &str, public_key_pem: &str) -> EnvelopeResult<String> {
    let key = parse_public_key(public_key_pem)?;
    encrypt_with_key(payload, &key)
}

/// Encrypts a string with a parsed RSA public key.
///
/// # Errors
///
/// Returns `EnvelopeError::CryptoError` if randomness or encryption fails.
pub fn encrypt_with_key(payload: &str, key: &RsaPublicKey) -> EnvelopeResult<String> {
    let mut secret = Zeroizing::new([0u8; WRAPPED_SECRET_SIZE]);
    OsRng
        .try_fill_bytes(&mut secret[..])
        .map_err(|_| EnvelopeError::CryptoError)?;
    let parts = split_secret(&secret[..])?;

    let mut ciphertext = payload.as_bytes().to_vec();
    apply_keystream(&parts.key, &parts.iv, &mut ciphertext);

    let wrapped_key = key
        .encrypt(&mut OsRng, Oaep::new::<Sha1>(), &secret[..])
        .map_err(|_| EnvelopeError::CryptoError)?;

    let mut envelope = Vec::with_capacity(wrapped_key.len() + ciphertext.len());
    envelope.extend_from_slice(&wrapped_key);
    envelope.extend_from_slice(&ciphertext);

    Ok(BASE64_STANDARD.encode(envelope))
}

/// Decrypts a sealed envelope with a PEM-encoded RSA private key.
///
/// # Errors
///
/// - `EnvelopeError::InvalidKey` if the PEM cannot be parsed
/// - `EnvelopeError::MalformedEnvelope` if the envelope is not base64 or is
///   shorter than the wrapped key
/// - `EnvelopeError::UnwrapFailed` if the wrapped key does not open under
///   this private key (wrong key or corruption; not distinguished)
/// - `EnvelopeError::PayloadDecode` if the plaintext is not UTF-8
pub fn decrypt(envelope: &str, private_key_pem: &str) -> EnvelopeResult<String> {
    let key = parse_private_key(private_key_pem)?;
    decrypt_with_key(envelope, &key)
}

/// Decrypts a sealed envelope with a parsed RSA private key.
///
/// # Errors
///
/// See [`decrypt`].
pub fn decrypt_with_key(envelope: &str, key: &RsaPrivateKey) -> EnvelopeResult<String> {
    let raw = BASE64_STANDARD.decode(envelope).map_err(|_| {
        tracing::debug!("sealed envelope is not valid base64");
        EnvelopeError::MalformedEnvelope
    })?;

    let wrapped_len = key.size();
    if raw.len() < wrapped_len {
        tracing::debug!(len = raw.len(), wrapped_len, "sealed envelope too short");
        return Err(EnvelopeError::MalformedEnvelope);
    }

    let (wrapped_key, ciphertext) = raw.split_at(wrapped_len);

    let secret = key
        .decrypt(Oaep::new::<Sha1>(), wrapped_key)
        .map(Zeroizing::new)
        .map_err(|_| {
            tracing::debug!("sealed envelope key unwrap failed");
            EnvelopeError::UnwrapFailed
        })?;
    let parts = split_secret(&secret)?;

    let mut plaintext = ciphertext.to_vec();
    apply_keystream(&parts.key, &parts.iv, &mut plaintext);

    String::from_utf8(plaintext).map_err(|_| EnvelopeError::PayloadDecode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_PUBLIC: &str = include_str!("../../../tests/fixtures/legacy_public.pem");
    const LEGACY_PRIVATE: &str = include_str!("../../../tests/fixtures/legacy_private.pem");
    const OTHER_PRIVATE: &str = include_str!("../../../tests/fixtures/other_private.pem");

    #[test]
    fn test_encrypt_decrypt_small() -> EnvelopeResult<()> {
        let envelope = encrypt("wawa", LEGACY_PUBLIC)?;
        assert_eq!(decrypt(&envelope, LEGACY_PRIVATE)?, "wawa");
        Ok(())
    }

    #[test]
    fn test_encrypt_decrypt_empty() -> EnvelopeResult<()> {
        let envelope = encrypt("", LEGACY_PUBLIC)?;
        let raw = BASE64_STANDARD
            .decode(&envelope)
            .map_err(|_| EnvelopeError::MalformedEnvelope)?;
        assert_eq!(raw.len(), 256);
        assert_eq!(decrypt(&envelope, LEGACY_PRIVATE)?, "");
        Ok(())
    }

    #[test]
    fn test_ciphertext_length_matches_payload() -> EnvelopeResult<()> {
        let envelope = encrypt("héllo wörld", LEGACY_PUBLIC)?;
        let raw = BASE64_STANDARD
            .decode(envelope)
            .map_err(|_| EnvelopeError::MalformedEnvelope)?;
        assert_eq!(raw.len(), 256 + "héllo wörld".len());
        Ok(())
    }

    #[test]
    fn test_encrypt_is_randomized() -> EnvelopeResult<()> {
        let first = encrypt("wawa", LEGACY_PUBLIC)?;
        let second = encrypt("wawa", LEGACY_PUBLIC)?;
        assert_ne!(first, second);
        assert_eq!(decrypt(&first, LEGACY_PRIVATE)?, decrypt(&second, LEGACY_PRIVATE)?);
        Ok(())
    }

    #[test]
    fn test_decrypt_wrong_key() -> EnvelopeResult<()> {
        let envelope = encrypt("wawa", LEGACY_PUBLIC)?;
        let result = decrypt(&envelope, OTHER_PRIVATE);
        assert!(matches!(result, Err(EnvelopeError::UnwrapFailed)));
        Ok(())
    }

    #[test]
    fn test_decrypt_corrupted_wrapped_key() -> EnvelopeResult<()> {
        let envelope = encrypt("wawa", LEGACY_PUBLIC)?;
        let mut raw = BASE64_STANDARD
            .decode(envelope)
            .map_err(|_| EnvelopeError::MalformedEnvelope)?;
        raw[10] ^= 0x80;

        let result = decrypt(&BASE64_STANDARD.encode(raw), LEGACY_PRIVATE);
        assert!(matches!(result, Err(EnvelopeError::UnwrapFailed)));
        Ok(())
    }

    #[test]
    fn test_decrypt_across_counter_wrap() -> EnvelopeResult<()> {
        let public = parse_public_key(LEGACY_PUBLIC)?;
        let mut secret = [0x5au8; WRAPPED_SECRET_SIZE];
        secret[STREAM_KEY_SIZE..STREAM_KEY_SIZE + 4].copy_from_slice(&u32::MAX.to_le_bytes());

        let plaintext = "wawa".repeat(50);
        let parts = split_secret(&secret)?;
        let mut ciphertext = plaintext.clone().into_bytes();
        apply_keystream(&parts.key, &parts.iv, &mut ciphertext);

        let mut raw = public
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), &secret)
            .map_err(|_| EnvelopeError::CryptoError)?;
        raw.extend_from_slice(&ciphertext);

        let envelope = BASE64_STANDARD.encode(raw);
        assert_eq!(decrypt(&envelope, LEGACY_PRIVATE)?, plaintext);
        Ok(())
    }

    #[test]
    fn test_decrypt_short_envelope() {
        let short = BASE64_STANDARD.encode([0u8; 100]);
        assert!(matches!(
            decrypt(&short, LEGACY_PRIVATE),
            Err(EnvelopeError::MalformedEnvelope)
        ));
    }

    #[test]
    fn test_split_secret_rejects_wrong_size() {
        assert!(matches!(
            split_secret(&[0u8; 32]),
            Err(EnvelopeError::UnwrapFailed)
        ));
    }
}
