// Consensus-critical. Changes require review + tests.
//! Canonical protocol types.
//!
//! Only the block header is consensus-visible at this layer. Its field order
//! and widths are fixed: the canonical encoding is the classic 80-byte header.

use crate::constants::*;
use borsh::{BorshDeserialize, BorshSerialize};
use core::fmt;
use core::str::FromStr;

/// Errors related to parsing or encoding core protocol types.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Hex string had an unexpected byte length.
    #[error("invalid hex length: expected {expected} bytes, got {got} bytes")]
    InvalidHexLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        got: usize,
    },

    /// Hex decoding failed.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A value violated protocol constraints.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// 32 bytes in wire order: header links, merkle roots and PoW digests.
///
/// A PoW digest compares against its target as a little-endian integer, so
/// `self.0[31]` is the most significant byte. Text form is the bytes in wire
/// order, not the byte-reversed form block explorers show.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct Hash32(pub [u8; HASH32_LEN]);

impl Hash32 {
    /// All-zero bytes: the `prev` link of genesis and the easiest possible digest.
    pub const fn zero() -> Self {
        Self([0u8; HASH32_LEN])
    }

    /// Bytes in wire order (least significant first when read as a digest).
    pub const fn as_bytes(&self) -> &[u8; HASH32_LEN] {
        &self.0
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({self})")
    }
}

/// Parses 64 hex digits in wire order, with or without a `0x` prefix.
impl FromStr for Hash32 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 2 * HASH32_LEN {
            return Err(CoreError::InvalidHexLength {
                expected: HASH32_LEN,
                got: digits.len() / 2,
            });
        }
        let mut bytes = [0u8; HASH32_LEN];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// Block hash type.
pub type BlockHash = Hash32;

/// Block header containing consensus-critical metadata.
///
/// Borsh writes fixed arrays without a length prefix and integers
/// little-endian, so this layout encodes to exactly [`BLOCK_HEADER_LEN`] bytes.
#[derive(Clone, PartialEq, Eq, Debug, Default, BorshSerialize, BorshDeserialize)]
pub struct BlockHeader {
    /// Header version.
    pub version: i32,
    /// Hash of the previous block.
    pub prev: BlockHash,
    /// Merkle root of transaction identifiers.
    pub merkle_root: Hash32,
    /// Block timestamp (Unix seconds).
    pub time: u32,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof-of-work nonce.
    pub nonce: u32,
}
