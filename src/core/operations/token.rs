//! Compact id tokens under a shared symmetric key.
//!
//! Format: `base64url(nonce || ciphertext || tag)` without padding
//!
//! - `nonce` - 32 random bytes, fresh per token
//! - `ciphertext` - XChaCha20 encryption of `id (i64 BE) || exp (i64 BE)`
//! - `tag` - BLAKE2b-MAC over `header || nonce || ciphertext`
//!
//! Encryption and authentication keys are derived from the token key and
//! the nonce:
//!
//! - `Ek || n2 = BLAKE2b-MAC(key, "sealed-envelope.token." || nonce, 56)`
//! - `Ak = BLAKE2b-MAC(key, "sealed-envelope.token." || nonce || "auth-key-for-tag", 32)`

use std::time::{SystemTime, UNIX_EPOCH};

use base64::prelude::*;
use blake2::digest::{FixedOutput, KeyInit, Update};
use blake2::Blake2bMac;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::XChaCha20;
use rand_core::{OsRng, RngCore};
use serde_json::Value;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::core::error::{EnvelopeError, EnvelopeResult};
use crate::core::types::{TokenClaims, TokenKey, CLAIMS_SIZE};

/// Nonce size for id tokens (32 bytes).
pub const TOKEN_NONCE_SIZE: usize = 32;

/// Tag size for id tokens (32 bytes).
pub const TOKEN_TAG_SIZE: usize = 32;

/// Total decoded size of an id token.
pub const TOKEN_DATA_SIZE: usize = TOKEN_NONCE_SIZE + CLAIMS_SIZE + TOKEN_TAG_SIZE;

/// Header bound into the tag; bumps with any change to the layout.
const TOKEN_HEADER: &[u8] = b"sealed-envelope.token.v1.";

/// Domain separation string for token key derivation.
const TOKEN_KDF_DOMAIN: &[u8] = b"sealed-envelope.token.";

/// Domain separation string for authentication key derivation.
const TOKEN_AUTH_KEY_DOMAIN: &[u8] = b"auth-key-for-tag";

type Blake2bMac56 = Blake2bMac<blake2::digest::consts::U56>;
type Blake2bMac32 = Blake2bMac<blake2::digest::consts::U32>;

struct DerivedKeys {
    encryption_key: Zeroizing<[u8; 32]>,
    xchacha_nonce: [u8; 24],
    auth_key: Zeroizing<[u8; 32]>,
}

fn derive_keys(key: &TokenKey, nonce: &[u8; TOKEN_NONCE_SIZE]) -> EnvelopeResult<DerivedKeys> {
    let mut kdf_mac = <Blake2bMac56 as KeyInit>::new_from_slice(key.as_bytes())
        .map_err(|_| EnvelopeError::CryptoError)?;
    <Blake2bMac56 as Update>::update(&mut kdf_mac, TOKEN_KDF_DOMAIN);
    <Blake2bMac56 as Update>::update(&mut kdf_mac, nonce);
    let mut tmp = <Blake2bMac56 as FixedOutput>::finalize_fixed(kdf_mac);

    let mut encryption_key = Zeroizing::new([0u8; 32]);
    encryption_key.copy_from_slice(&tmp[..32]);

    let mut xchacha_nonce = [0u8; 24];
    xchacha_nonce.copy_from_slice(&tmp[32..56]);
    zeroize::Zeroize::zeroize(tmp.as_mut_slice());

    let mut auth_mac = <Blake2bMac32 as KeyInit>::new_from_slice(key.as_bytes())
        .map_err(|_| EnvelopeError::CryptoError)?;
    <Blake2bMac32 as Update>::update(&mut auth_mac, TOKEN_KDF_DOMAIN);
    <Blake2bMac32 as Update>::update(&mut auth_mac, nonce);
    <Blake2bMac32 as Update>::update(&mut auth_mac, TOKEN_AUTH_KEY_DOMAIN);
    let auth_key: [u8; 32] = <Blake2bMac32 as FixedOutput>::finalize_fixed(auth_mac).into();

    Ok(DerivedKeys {
        encryption_key,
        xchacha_nonce,
        auth_key: Zeroizing::new(auth_key),
    })
}

fn compute_tag(
    auth_key: &[u8; 32],
    nonce: &[u8; TOKEN_NONCE_SIZE],
    ciphertext: &[u8; CLAIMS_SIZE],
) -> EnvelopeResult<[u8; TOKEN_TAG_SIZE]> {
    let mut tag_mac =
        <Blake2bMac32 as KeyInit>::new_from_slice(auth_key).map_err(|_| EnvelopeError::CryptoError)?;
    <Blake2bMac32 as Update>::update(&mut tag_mac, TOKEN_HEADER);
    <Blake2bMac32 as Update>::update(&mut tag_mac, nonce);
    <Blake2bMac32 as Update>::update(&mut tag_mac, ciphertext);
    Ok(<Blake2bMac32 as FixedOutput>::finalize_fixed(tag_mac).into())
}

/// 2^63, the first float past the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Reads an integer from a JSON number. Integral floats such as `22334.0`
/// count as integers when they fit `i64`.
fn json_integer(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    let float = value.as_f64()?;
    if float.is_finite() && float.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&float) {
        return Some(float as i64);
    }
    None
}

/// Current time in epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Generates a fresh token key as 64 hex characters.
///
/// # Errors
///
/// Returns `EnvelopeError::CryptoError` if the random source fails.
pub fn generate_token_key() -> EnvelopeResult<String> {
    Ok(TokenKey::generate()?.to_string())
}

/// Encrypts an id and optional expiry (epoch milliseconds) into a token.
///
/// # Errors
///
/// Returns `EnvelopeError::InvalidKeySize` if `token_key` is not 64 hex
/// characters, or `EnvelopeError::CryptoError` if encryption fails.
///
/// # Example
///
/// ```rust
/// use sealed_envelope::{decrypt_id, encrypt_id, generate_token_key};
///
/// let key = generate_token_key()?;
/// let token = encrypt_id(&key, 22334, None)?;
/// let claims = decrypt_id(&key, &token)?;
/// assert_eq!((claims.id, claims.exp), (22334, 0));
/// # Ok::<(), sealed_envelope::EnvelopeError>(())
/// ```
pub fn encrypt_id(token_key: &str, id: i64, exp: Option<i64>) -> EnvelopeResult<String> {
    let key = TokenKey::try_from(token_key)?;
    encrypt_claims(&key, TokenClaims::new(id, exp))
}

/// Encrypts an id and optional expiry given as dynamic JSON values.
///
/// Checks run in order: key size, then id, then expiry. A JSON `null`
/// expiry is treated as absent. Numbers with no fractional part, written
/// either way (`22334` or `22334.0`), are integers.
///
/// # Errors
///
/// - `EnvelopeError::InvalidKeySize` if `token_key` is not 64 hex characters
/// - `EnvelopeError::InvalidId` if `id` is not an integer fitting `i64`
/// - `EnvelopeError::InvalidExpiry` if `exp` is not an integer fitting `i64`
pub fn encrypt_id_value(
    token_key: &str,
    id: &Value,
    exp: Option<&Value>,
) -> EnvelopeResult<String> {
    let key = TokenKey::try_from(token_key)?;
    let id = json_integer(id).ok_or(EnvelopeError::InvalidId)?;
    let exp = match exp {
        None | Some(Value::Null) => None,
        Some(value) => Some(json_integer(value).ok_or(EnvelopeError::InvalidExpiry)?),
    };
    encrypt_claims(&key, TokenClaims::new(id, exp))
}

/// Encrypts claims under a parsed token key.
///
/// # Errors
///
/// Returns `EnvelopeError::CryptoError` if randomness or key derivation fails.
pub fn encrypt_claims(key: &TokenKey, claims: TokenClaims) -> EnvelopeResult<String> {
    let mut nonce = [0u8; TOKEN_NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|_| EnvelopeError::CryptoError)?;

    let keys = derive_keys(key, &nonce)?;

    let mut ciphertext = claims.to_bytes();
    let mut cipher = XChaCha20::new(&(*keys.encryption_key).into(), &keys.xchacha_nonce.into());
    cipher.apply_keystream(&mut ciphertext);

    let tag = compute_tag(&keys.auth_key, &nonce, &ciphertext)?;

    let mut data = [0u8; TOKEN_DATA_SIZE];
    data[..TOKEN_NONCE_SIZE].copy_from_slice(&nonce);
    data[TOKEN_NONCE_SIZE..TOKEN_NONCE_SIZE + CLAIMS_SIZE].copy_from_slice(&ciphertext);
    data[TOKEN_NONCE_SIZE + CLAIMS_SIZE..].copy_from_slice(&tag);

    Ok(BASE64_URL_SAFE_NO_PAD.encode(data))
}

/// Decrypts a token and checks its expiry against the current time.
///
/// # Errors
///
/// - `EnvelopeError::InvalidKeySize` if `token_key` is not 64 hex characters
/// - `EnvelopeError::MalformedToken` if the token does not decode or fails
///   authentication
/// - `EnvelopeError::TokenExpired` if the expiry has passed
pub fn decrypt_id(token_key: &str, token: &str) -> EnvelopeResult<TokenClaims> {
    decrypt_id_at(token_key, token, now_millis())
}

/// Decrypts a token and checks its expiry against `now_millis`.
///
/// # Errors
///
/// See [`decrypt_id`].
pub fn decrypt_id_at(token_key: &str, token: &str, now_millis: i64) -> EnvelopeResult<TokenClaims> {
    let key = TokenKey::try_from(token_key)?;
    let claims = decrypt_claims(&key, token)?;

    if claims.is_expired_at(now_millis) {
        tracing::debug!(exp = claims.exp, now_millis, "token expired");
        return Err(EnvelopeError::TokenExpired);
    }

    Ok(claims)
}

/// Authenticates and decrypts a token without checking its expiry.
///
/// # Errors
///
/// Returns `EnvelopeError::MalformedToken` if the token does not decode or
/// fails authentication.
pub fn decrypt_claims(key: &TokenKey, token: &str) -> EnvelopeResult<TokenClaims> {
    let data = BASE64_URL_SAFE_NO_PAD.decode(token).map_err(|_| {
        tracing::debug!("token is not valid base64url");
        EnvelopeError::MalformedToken
    })?;

    if data.len() != TOKEN_DATA_SIZE {
        tracing::debug!(len = data.len(), "token has wrong length");
        return Err(EnvelopeError::MalformedToken);
    }

    let mut nonce = [0u8; TOKEN_NONCE_SIZE];
    let mut ciphertext = [0u8; CLAIMS_SIZE];
    let mut tag = [0u8; TOKEN_TAG_SIZE];
    nonce.copy_from_slice(&data[..TOKEN_NONCE_SIZE]);
    ciphertext.copy_from_slice(&data[TOKEN_NONCE_SIZE..TOKEN_NONCE_SIZE + CLAIMS_SIZE]);
    tag.copy_from_slice(&data[TOKEN_NONCE_SIZE + CLAIMS_SIZE..]);

    let keys = derive_keys(key, &nonce)?;
    let computed_tag = compute_tag(&keys.auth_key, &nonce, &ciphertext)?;

    if !bool::from(computed_tag.ct_eq(&tag)) {
        tracing::debug!("token failed authentication");
        return Err(EnvelopeError::MalformedToken);
    }

    let mut plaintext = ciphertext;
    let mut cipher = XChaCha20::new(&(*keys.encryption_key).into(), &keys.xchacha_nonce.into());
    cipher.apply_keystream(&mut plaintext);

    Ok(TokenClaims::from_bytes(&plaintext))
}
