/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// CBC initialization vector length in bytes (one block).
pub const IV_LENGTH: usize = BLOCK_SIZE;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;

/// Fixed, non-secret salt prepended to the passphrase before hashing.
///
/// Changing this breaks decryption of every command already stored remotely.
pub const KEY_SALT: &str = "cmdtrack!";
