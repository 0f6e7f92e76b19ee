use sha2::{Digest, Sha256};

/// Compute SHA-256 of an in-memory byte slice.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode a raw 32-byte hash as a lowercase hex string (64 chars).
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Content fingerprint of a statement's extracted text. Line endings and
/// surrounding whitespace are ignored so a re-extracted copy of the same
/// statement hashes identically.
pub fn fingerprint(text: &str) -> String {
    let canonical = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    to_hex(&sha256_bytes(canonical.trim().as_bytes()))
}
