use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Encrypted data too short: {got} bytes, need at least {min}")]
    DataTooShort { got: usize, min: usize },

    #[error("Ciphertext length {0} is not a multiple of the block size")]
    UnalignedCiphertext(usize),

    #[error("Invalid padding byte: {0}")]
    InvalidPadding(u8),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Decrypted text is not valid UTF-8")]
    InvalidUtf8,

    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

impl CryptoError {
    /// True when the failure is in the textual encoding rather than the envelope itself.
    pub fn is_encoding(&self) -> bool {
        matches!(self, CryptoError::InvalidBase64(_))
    }
}
