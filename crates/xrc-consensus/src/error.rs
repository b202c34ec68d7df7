//! Consensus error types.

use thiserror::Error;

/// Errors returned by difficulty computation and header validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// Compact `bits` do not decode to a usable target.
    #[error("malformed compact target 0x{0:08x}")]
    MalformedTarget(u32),

    /// Claimed `bits` differ from the target required at this height.
    #[error("bad difficulty bits: required 0x{required:08x}, claimed 0x{claimed:08x}")]
    BadDiffBits {
        /// Compact form of the required target.
        required: u32,
        /// Bits carried by the header.
        claimed: u32,
    },

    /// Proof-of-work hash is above the claimed target, or the claimed target is malformed.
    #[error("proof-of-work hash above claimed target")]
    HighHash,

    /// Header was produced too soon after its predecessor.
    #[error("block time {time} is before earliest allowed {earliest}")]
    TimeTooNew {
        /// Header timestamp.
        time: u32,
        /// Earliest timestamp the header could have carried.
        earliest: u64,
    },

    /// The caller's chain view lacks a header the rules need.
    #[error("ancestor at height {height} missing from chain view")]
    MissingAncestor {
        /// Height of the header that could not be resolved.
        height: u32,
    },

    /// Header could not be encoded for hashing.
    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),
}

impl ConsensusError {
    /// True when the error signals caller misuse rather than an invalid header.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ConsensusError::MissingAncestor { .. })
    }
}
