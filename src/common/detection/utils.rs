//! Utility functions and constants for file format detection.

// Magic number signatures
pub const OLE2_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
pub const ZIP_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// Check whether `bytes` begins with `signature`.
#[inline]
pub fn has_signature(bytes: &[u8], signature: &[u8]) -> bool {
    bytes.len() >= signature.len() && &bytes[..signature.len()] == signature
}
