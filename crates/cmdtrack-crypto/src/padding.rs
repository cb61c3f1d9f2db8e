//! Block padding for CBC.
//!
//! Format: `[data][k bytes of value k]` where `k = BLOCK_SIZE - (len % BLOCK_SIZE)`.
//! Block-aligned input still gets a full block of padding, so `k` is always
//! in `1..=BLOCK_SIZE` and removal is unambiguous.

use crate::error::CryptoError;
use crate::types::BLOCK_SIZE;

/// Pad data up to the next block boundary.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Remove padding added by [`pad`].
///
/// The final byte must name a length in `1..=BLOCK_SIZE` that fits inside
/// `data`, and every byte of the claimed padding must repeat it.
pub fn unpad(data: &[u8]) -> Result<&[u8], CryptoError> {
    let &last = data.last().ok_or(CryptoError::InvalidPadding(0))?;
    let pad_len = last as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > data.len() {
        return Err(CryptoError::InvalidPadding(last));
    }
    let (body, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| b != last) {
        return Err(CryptoError::InvalidPadding(last));
    }
    Ok(body)
}
