//! Signed-payload envelopes.
//!
//! Format: `base64(signature || payload || tag)`
//!
//! - `signature` - RSA-PSS over SHA-256 of `payload`, modulus-length bytes
//!   (256 for RSA-2048)
//! - `payload` - UTF-8 text or compact JSON
//! - `tag` - `s` for text, `j` for JSON
//!
//! PSS draws a fresh salt for every signature, so signing the same payload
//! twice yields two different envelopes that both verify. Signing uses the
//! maximum salt length; verification recovers the salt length from the
//! signature and accepts any valid one.

use base64::prelude::*;
use rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pss, RsaPrivateKey, RsaPublicKey};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::core::error::{EnvelopeError, EnvelopeResult};
use crate::core::keys::{parse_private_key, parse_public_key};
use crate::core::types::Payload;

/// Size of a SHA-256 digest.
const DIGEST_SIZE: usize = 32;

/// Maximum PSS salt length for a key (`emLen - hLen - 2`).
fn max_salt_len(key: &impl PublicKeyParts) -> usize {
    let em_len = (key.n().bits() + 6) / 8;
    em_len.saturating_sub(DIGEST_SIZE + 2)
}

/// XORs the MGF1-SHA256 mask for `seed` into `out`.
fn mgf1_xor(out: &mut [u8], seed: &[u8]) {
    let mut counter = 0u32;
    for chunk in out.chunks_mut(DIGEST_SIZE) {
        let mask = Sha256::new()
            .chain_update(seed)
            .chain_update(counter.to_be_bytes())
            .finalize();
        for (byte, mask_byte) in chunk.iter_mut().zip(mask.iter()) {
            *byte ^= mask_byte;
        }
        counter = counter.wrapping_add(1);
    }
}

/// Recovers the salt length of a PSS signature from its encoded message.
///
/// Returns `None` if the signature does not open to a well-formed PSS
/// encoding. The result only selects the salt length; the signature itself
/// is still checked by `rsa`.
fn recover_salt_len(key: &RsaPublicKey, signature: &[u8]) -> Option<usize> {
    let key_len = key.size();
    if signature.len() != key_len {
        return None;
    }

    let s = BigUint::from_bytes_be(signature);
    if s >= *key.n() {
        return None;
    }
    let m = s.modpow(key.e(), key.n()).to_bytes_be();
    if m.len() > key_len {
        return None;
    }
    let mut em = vec![0u8; key_len];
    em[key_len - m.len()..].copy_from_slice(&m);

    let em_bits = key.n().bits() - 1;
    let em_len = (em_bits + 7) / 8;
    let em = &mut em[key_len - em_len..];
    if em_len < DIGEST_SIZE + 2 || em[em_len - 1] != 0xbc {
        return None;
    }

    let (db, rest) = em.split_at_mut(em_len - DIGEST_SIZE - 1);
    mgf1_xor(db, &rest[..DIGEST_SIZE]);
    db[0] &= 0xff >> (8 * em_len - em_bits);

    // DB = zero padding || 0x01 || salt
    let separator = db.iter().position(|&b| b != 0)?;
    if db[separator] != 0x01 {
        return None;
    }
    Some(db.len() - separator - 1)
}

/// Signs a payload with a PEM-encoded RSA private key.
///
/// # Errors
///
/// Returns `EnvelopeError::InvalidKey` if the PEM cannot be parsed, or
/// `EnvelopeError::CryptoError` if signing fails.
///
/// # Example
///
/// ```rust
/// use sealed_envelope::{generate_key_pair, sign, verify, Payload};
///
/// let pair = generate_key_pair()?;
/// let envelope = sign("wawa", &pair.private_key)?;
/// assert_eq!(verify(&envelope, &pair.public_key)?, Payload::from("wawa"));
/// # Ok::<(), sealed_envelope::EnvelopeError>(())
/// ```
pub fn sign(payload: impl Into<Payload>, private_key_pem: &str) -> EnvelopeResult<String> {
    let key = parse_private_key(private_key_pem)?;
    sign_with_key(&payload.into(), &key)
}

/// Signs any serializable value as a JSON payload.
///
/// # Errors
///
/// Returns `EnvelopeError::PayloadEncode` if `value` cannot be serialized,
/// plus the errors of [`sign`].
pub fn sign_serialize<T: Serialize + ?Sized>(
    value: &T,
    private_key_pem: &str,
) -> EnvelopeResult<String> {
    let payload = Payload::from_serialize(value)?;
    let key = parse_private_key(private_key_pem)?;
    sign_with_key(&payload, &key)
}

/// Signs a payload with a parsed RSA private key.
///
/// # Errors
///
/// Returns `EnvelopeError::CryptoError` if signing fails.
pub fn sign_with_key(payload: &Payload, key: &RsaPrivateKey) -> EnvelopeResult<String> {
    let data = payload.to_bytes()?;
    let hashed = Sha256::digest(&data);

    let signature = key
        .sign_with_rng(
            &mut OsRng,
            Pss::new_with_salt::<Sha256>(max_salt_len(key)),
            &hashed,
        )
        .map_err(|_| EnvelopeError::CryptoError)?;

    let mut envelope = Vec::with_capacity(signature.len() + data.len() + 1);
    envelope.extend_from_slice(&signature);
    envelope.extend_from_slice(&data);
    envelope.push(payload.tag());

    Ok(BASE64_STANDARD.encode(envelope))
}

/// Verifies a signed envelope with a PEM-encoded RSA public key and returns
/// its payload.
///
/// # Errors
///
/// - `EnvelopeError::InvalidKey` if the PEM cannot be parsed
/// - `EnvelopeError::MalformedEnvelope` if the envelope is not base64, is
///   too short, or has an unknown type tag
/// - `EnvelopeError::SignatureInvalid` if the payload was tampered with or
///   signed by a different key
/// - `EnvelopeError::PayloadDecode` if the payload does not match its tag
pub fn verify(envelope: &str, public_key_pem: &str) -> EnvelopeResult<Payload> {
    let key = parse_public_key(public_key_pem)?;
    verify_with_key(envelope, &key)
}

/// Verifies a signed envelope with a parsed RSA public key.
///
/// # Errors
///
/// See [`verify`].
pub fn verify_with_key(envelope: &str, key: &RsaPublicKey) -> EnvelopeResult<Payload> {
    let raw = BASE64_STANDARD.decode(envelope).map_err(|_| {
        tracing::debug!("signed envelope is not valid base64");
        EnvelopeError::MalformedEnvelope
    })?;

    let signature_len = key.size();
    if raw.len() < signature_len + 1 {
        tracing::debug!(len = raw.len(), signature_len, "signed envelope too short");
        return Err(EnvelopeError::MalformedEnvelope);
    }

    let (signature, rest) = raw.split_at(signature_len);
    let (data, tag) = rest.split_at(rest.len() - 1);

    let hashed = Sha256::digest(data);
    let verified = recover_salt_len(key, signature).is_some_and(|salt_len| {
        key.verify(Pss::new_with_salt::<Sha256>(salt_len), &hashed, signature)
            .is_ok()
    });
    if !verified {
        tracing::debug!("signed envelope failed verification");
        return Err(EnvelopeError::SignatureInvalid);
    }

    Payload::from_tagged_bytes(tag[0], data)
}
