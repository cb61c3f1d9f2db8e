//! AES-256-CBC envelope encryption.
//!
//! Wire format: `[IV:16B][AES-256-CBC(pad(plaintext))]`
//! The IV is fresh OS randomness for every call, so encrypting the same
//! plaintext twice never yields the same envelope.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::CryptoError;
use crate::kdf::{derive_key, DerivedKey};
use crate::padding::{pad, unpad};
use crate::types::{BLOCK_SIZE, IV_LENGTH};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Generate a random 16-byte IV.
pub fn generate_iv() -> Result<[u8; IV_LENGTH], CryptoError> {
    let mut iv = [0u8; IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// Envelope cipher bound to one passphrase.
///
/// The key is derived once at construction and wiped when the cipher is dropped.
#[derive(Clone, Debug)]
pub struct CommandCipher {
    key: DerivedKey,
}

impl CommandCipher {
    /// Create a cipher for the given passphrase.
    pub fn new(passphrase: &str) -> Self {
        Self {
            key: derive_key(passphrase),
        }
    }

    /// Encrypt `plaintext`, returning `IV || ciphertext`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let iv = generate_iv()?;
        let encryptor = Aes256CbcEnc::new(self.key.as_bytes().into(), &iv.into());
        // pad() always yields whole blocks, so NoPadding never sees a partial one.
        let ciphertext = encryptor.encrypt_padded_vec_mut::<NoPadding>(&pad(plaintext));

        let mut result = Vec::with_capacity(IV_LENGTH + ciphertext.len());
        result.extend_from_slice(&iv);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt an envelope produced by [`CommandCipher::encrypt`].
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let min_length = IV_LENGTH + BLOCK_SIZE;
        if blob.len() < min_length {
            return Err(CryptoError::DataTooShort {
                got: blob.len(),
                min: min_length,
            });
        }

        let (iv, body) = blob.split_at(IV_LENGTH);
        if body.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::UnalignedCiphertext(body.len()));
        }

        let decryptor = Aes256CbcDec::new_from_slices(self.key.as_bytes(), iv)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
        let padded = decryptor
            .decrypt_padded_vec_mut::<NoPadding>(body)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

        Ok(unpad(&padded)?.to_vec())
    }
}

/// Encrypt `plaintext` under a key derived from `passphrase`.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    CommandCipher::new(passphrase).encrypt(plaintext)
}

/// Decrypt an envelope under a key derived from `passphrase`.
pub fn decrypt(blob: &[u8], passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    CommandCipher::new(passphrase).decrypt(blob)
}
