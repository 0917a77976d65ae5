//! Password hashing and verification.
//!
//! bcrypt produces a self-contained salted digest, so no separate salt
//! column is needed. The work factor comes from `SecurityConfig` and can be
//! raised without invalidating existing hashes.

use bcrypt::BcryptError;

/// Hash a plaintext password for storage.
///
/// Fails only on catastrophic system error (e.g. the entropy source is
/// unavailable); callers must abort the enclosing operation on failure
/// rather than fall back to storing plaintext.
pub fn hash(plaintext: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext, cost)
}

/// Verify a plaintext password against a stored hash.
pub fn verify(plaintext: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plaintext, hash)
}
