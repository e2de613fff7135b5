//! ChaCha20 with a 16-byte IV.
//!
//! The IV is laid out as `initial block counter (u32, little-endian) ||
//! 96-bit nonce`, which is the layout OpenSSL uses for its `chacha20`
//! cipher. Envelopes sealed by either side therefore decrypt on the other.

use chacha20::cipher::consts::U10;
use chacha20::cipher::{Block, KeyIvInit, StreamCipherCore, StreamCipherSeekCore};
use chacha20::ChaChaCore;
use zeroize::Zeroize;

type ChaCha20Core = ChaChaCore<U10>;

/// Size of the stream cipher key.
pub const STREAM_KEY_SIZE: usize = 32;

/// Size of the stream cipher IV (counter + nonce).
pub const STREAM_IV_SIZE: usize = 16;

const BLOCK_SIZE: usize = 64;

fn split_iv(iv: &[u8; STREAM_IV_SIZE]) -> (u32, [u8; 12]) {
    let mut counter = [0u8; 4];
    let mut nonce = [0u8; 12];
    counter.copy_from_slice(&iv[..4]);
    nonce.copy_from_slice(&iv[4..]);
    (u32::from_le_bytes(counter), nonce)
}

/// Adds one to the first little-endian nonce word, wrapping on overflow.
fn carry_into_nonce(nonce: &mut [u8; 12]) {
    let mut word = [0u8; 4];
    word.copy_from_slice(&nonce[..4]);
    let word = u32::from_le_bytes(word).wrapping_add(1);
    nonce[..4].copy_from_slice(&word.to_le_bytes());
}

/// XORs the keystream into `data` in place. Encryption and decryption are
/// the same operation.
///
/// When the 32-bit block counter wraps, it restarts at zero and the carry
/// is added to the first nonce word, so any payload length is accepted for
/// any IV.
pub(crate) fn apply_keystream(
    key: &[u8; STREAM_KEY_SIZE],
    iv: &[u8; STREAM_IV_SIZE],
    data: &mut [u8],
) {
    let (mut counter, mut nonce) = split_iv(iv);
    let mut chacha = ChaCha20Core::new(&(*key).into(), &nonce.into());
    chacha.set_block_pos(counter);

    let mut block = Block::<ChaCha20Core>::default();
    for chunk in data.chunks_mut(BLOCK_SIZE) {
        chacha.write_keystream_block(&mut block);
        for (byte, stream_byte) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= stream_byte;
        }

        if counter == u32::MAX {
            carry_into_nonce(&mut nonce);
            chacha = ChaCha20Core::new(&(*key).into(), &nonce.into());
            counter = 0;
        } else {
            counter += 1;
        }
    }
    block.as_mut_slice().zeroize();
}
