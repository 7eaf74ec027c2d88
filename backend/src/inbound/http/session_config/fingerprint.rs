//! Session key fingerprinting.
//!
//! Operators compare the logged fingerprint with the one computed from the
//! mounted secret to confirm which key a replica is using.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of the key's master material, hex encoded.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use visa_backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::derive_from(&[7u8; 64]));
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.master());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
