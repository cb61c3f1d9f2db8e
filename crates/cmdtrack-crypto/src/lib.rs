//! Command-text encryption for cmdtrack.
//!
//! Envelope format: `[IV:16B][AES-256-CBC(padded plaintext)]`, optionally
//! base64-encoded for transport. The key is `SHA-256(salt || passphrase)`.

pub mod envelope;
pub mod error;
pub mod kdf;
pub mod padding;
pub mod text;
pub mod types;

pub use envelope::{decrypt, encrypt, generate_iv, CommandCipher};
pub use error::CryptoError;
pub use kdf::{derive_key, DerivedKey};
pub use padding::{pad, unpad};
pub use text::{base64_decode, base64_encode, decrypt_base64, encrypt_base64};
pub use types::{AES_KEY_LENGTH, BLOCK_SIZE, IV_LENGTH, KEY_SALT};
