//! Base64 wrappers used to move envelopes through text channels.

use base64ct::{Base64, Encoding};

use crate::envelope::CommandCipher;
use crate::error::CryptoError;

/// Standard (padded) base64 encode.
pub fn base64_encode(data: &[u8]) -> String {
    Base64::encode_string(data)
}

/// Standard (padded) base64 decode.
pub fn base64_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    Base64::decode_vec(s).map_err(|e| CryptoError::InvalidBase64(e.to_string()))
}

impl CommandCipher {
    /// Encrypt UTF-8 text and base64-encode the envelope.
    pub fn encrypt_base64(&self, text: &str) -> Result<String, CryptoError> {
        Ok(base64_encode(&self.encrypt(text.as_bytes())?))
    }

    /// Decode a base64 envelope and decrypt it back to text.
    pub fn decrypt_base64(&self, encoded: &str) -> Result<String, CryptoError> {
        let blob = base64_decode(encoded)?;
        String::from_utf8(self.decrypt(&blob)?).map_err(|_| CryptoError::InvalidUtf8)
    }
}

pub fn encrypt_base64(text: &str, passphrase: &str) -> Result<String, CryptoError> {
    CommandCipher::new(passphrase).encrypt_base64(text)
}

pub fn decrypt_base64(encoded: &str, passphrase: &str) -> Result<String, CryptoError> {
    CommandCipher::new(passphrase).decrypt_base64(encoded)
}
