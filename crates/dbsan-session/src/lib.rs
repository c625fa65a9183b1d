//! Process-local, thread-local session secret used by deterministic but
//! unrecoverable sanitizers (UUID re-derivation, synthetic identity
//! generation, etc.).
//!
//! Each thread lazily materializes its own secret on first use, so pipeline
//! instances running on separate threads never cross-contaminate, and tests
//! can install a deterministic key with [`reset`].

use std::cell::RefCell;

use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Minimum entropy drawn from the OS when materializing a fresh secret.
const SECRET_KEY_BITS: usize = 128;
const SECRET_KEY_BYTES: usize = SECRET_KEY_BITS / 8;

thread_local! {
    static SECRET: RefCell<Option<Vec<u8>>> = const { RefCell::new(None) };
}

/// Returns the current thread's secret, materializing a fresh OS-random one
/// if none is set yet.
pub fn secret() -> Vec<u8> {
    SECRET.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let mut bytes = vec![0u8; SECRET_KEY_BYTES];
            OsRng.fill_bytes(&mut bytes);
            *slot = Some(bytes);
        }
        slot.as_ref().expect("just materialized").clone()
    })
}

/// Clears the current thread's secret, or installs a caller-supplied value.
/// Passing `None` forces re-materialization from the OS on next use.
pub fn reset(key: Option<Vec<u8>>) {
    SECRET.with(|cell| {
        *cell.borrow_mut() = key;
    });
}

/// Keyed hash (HMAC-SHA256) over raw bytes, returning the raw digest.
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let key = secret();
    let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Keyed hash over the UTF-8 bytes of `s`, returning lowercase hex.
pub fn hash_text(s: &str) -> String {
    hash_bytes(s.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// First `bits / 4` hex digits of `hash_text(s)`, parsed as base 16.
///
/// # Panics
/// Panics if `bits` is not a multiple of 4 or exceeds 256 — both are
/// programming errors, never a function of the dump stream's contents.
pub fn hash_text_to_int(s: &str, bits: u32) -> u64 {
    hash_text_to_ints(s, &[bits])[0]
}

/// Default bit width used by [`hash_text_to_int`] when the caller does not
/// care to choose one explicitly.
pub const DEFAULT_INT_BITS: u32 = 32;

/// Convenience wrapper over [`hash_text_to_int`] using [`DEFAULT_INT_BITS`].
pub fn hash_text_to_int_default(s: &str) -> u64 {
    hash_text_to_int(s, DEFAULT_INT_BITS)
}

/// Partitions the hex digest of `hash_text(s)` into consecutive
/// non-overlapping windows of the given bit widths, returning each window
/// parsed as an unsigned integer.
///
/// # Panics
/// Panics if any width is not a multiple of 4, or if the widths sum to more
/// than 256 bits (the digest is only 256 bits wide) — both are programming
/// errors.
pub fn hash_text_to_ints(s: &str, bit_lengths: &[u32]) -> Vec<u64> {
    let total: u32 = bit_lengths.iter().sum();
    assert!(total <= 256, "bit_lengths sum to {total} bits, digest is only 256 bits wide");
    for &bits in bit_lengths {
        assert!(bits % 4 == 0, "bit width {bits} is not a multiple of 4");
    }

    let digest = hash_text(s);
    let mut pos = 0usize;
    let mut out = Vec::with_capacity(bit_lengths.len());
    for &bits in bit_lengths {
        let nibbles = (bits / 4) as usize;
        let chunk = &digest[pos..pos + nibbles];
        out.push(u64::from_str_radix(chunk, 16).expect("hex digest slice"));
        pos += nibbles;
    }
    out
}
