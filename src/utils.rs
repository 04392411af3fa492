use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of the UTF-8 plaintext.
///
/// Unsalted: identical passwords always produce identical digests, which is
/// the format stored in `users.password_hash`.
pub fn hash_password(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

pub fn verify_password(plaintext: &str, stored_digest: &str) -> bool {
    hash_password(plaintext) == stored_digest
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix epoch seconds.
pub fn epoch_now() -> i64 {
    utc_now().timestamp()
}

/// Split a `;`-separated tag column into trimmed tags. Empty input yields no tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(';').map(|tag| tag.trim().to_string()).collect()
}
