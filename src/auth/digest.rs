//! Deterministic password digest.
//!
//! Login matches on `(username, digest, status)` in a single store query, so
//! the digest must be unsalted and stable across calls. SHA-256 hex output.

use sha2::{Digest, Sha256};

/// Digests a plaintext password into a 64-character lowercase hex string.
pub fn digest(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    let result = hasher.finalize();
    result
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}
