// Consensus-critical. Changes require review + tests.
//! Canonical serialization helpers.
//!
//! Rule: header bytes fed to proof-of-work digests come from Borsh only.

use crate::constants::BLOCK_HEADER_LEN;
use crate::types::{BlockHeader, CoreError};
use borsh::to_vec;

/// Encode a value with canonical Borsh encoding.
pub fn to_bytes<T: borsh::BorshSerialize>(v: &T) -> Result<Vec<u8>, CoreError> {
    to_vec(v).map_err(|_| CoreError::InvalidValue("borsh serialization failed"))
}

/// Canonical 80-byte header encoding.
pub fn header_bytes(h: &BlockHeader) -> Result<[u8; BLOCK_HEADER_LEN], CoreError> {
    let bytes = to_bytes(h)?;
    bytes
        .try_into()
        .map_err(|_| CoreError::InvalidValue("header encoding has unexpected length"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hash32;

    #[test]
    fn header_encodes_to_legacy_layout() {
        let header = BlockHeader {
            version: 0x2000_0000,
            prev: Hash32([0x11; 32]),
            merkle_root: Hash32([0x22; 32]),
            time: 0x5ad2_1234,
            bits: 0x1d00_ffff,
            nonce: 0xdead_beef,
        };
        let bytes = header_bytes(&header).unwrap();

        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x00, 0x20]);
        assert_eq!(&bytes[4..36], &[0x11; 32]);
        assert_eq!(&bytes[36..68], &[0x22; 32]);
        assert_eq!(&bytes[68..72], &[0x34, 0x12, 0xd2, 0x5a]);
        assert_eq!(&bytes[72..76], &[0xff, 0xff, 0x00, 0x1d]);
        assert_eq!(&bytes[76..80], &[0xef, 0xbe, 0xad, 0xde]);
    }
}
