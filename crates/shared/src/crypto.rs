//! Digest helpers for credential comparison.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two secrets by their fixed-length SHA-256 digests.
pub fn digest_eq(supplied: &str, expected: &str) -> bool {
    sha256_hex(supplied) == sha256_hex(expected)
}
