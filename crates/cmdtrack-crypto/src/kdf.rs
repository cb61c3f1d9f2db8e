//! Passphrase key derivation.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::{AES_KEY_LENGTH, KEY_SALT};

/// A 256-bit AES key derived from a passphrase. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; AES_KEY_LENGTH]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; AES_KEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive the encryption key as `SHA-256(KEY_SALT || passphrase)`.
///
/// Deterministic: the same passphrase always yields the same key, which is
/// what lets every machine sharing a passphrase read each other's history.
pub fn derive_key(passphrase: &str) -> DerivedKey {
    let mut hasher = Sha256::new();
    hasher.update(KEY_SALT.as_bytes());
    hasher.update(passphrase.as_bytes());
    DerivedKey(hasher.finalize().into())
}
