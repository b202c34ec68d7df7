// Consensus-critical. Changes require review + tests.
//! Proof-of-work hash selection.
//!
//! The PoW digest of a header depends on its own timestamp:
//!
//! - after `digishield_x11_time`: X11
//! - after `pow_limit2_time`: X13 in compatible mode
//! - otherwise: X13 in legacy mode
//!
//! The digest is computed over the 80-byte wire encoding of the header and read
//! as a little-endian 256-bit integer. The X11/X13 primitives live outside this
//! crate behind [`PowHasher`].

use crate::error::ConsensusError;
use crate::params::NetworkParams;
use xrc_core::{header_bytes, BlockHeader, Hash32};

/// X13 operating mode, passed to the primitive as a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum X13Mode {
    /// Pre-PowLimit2 hashing.
    Legacy,
    /// Hashing from the PowLimit2 hard fork on.
    Compatible,
}

impl X13Mode {
    /// Numeric mode understood by the X13 primitive.
    pub fn code(self) -> u32 {
        match self {
            X13Mode::Legacy => 1,
            X13Mode::Compatible => 2,
        }
    }
}

/// Hash function a header is mined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowAlgorithm {
    /// X11 chained hash.
    X11,
    /// X13 chained hash in the given mode.
    X13(X13Mode),
}

/// External X11/X13 primitives.
///
/// Implementations must be deterministic; the engine treats them as pure
/// functions of their input.
pub trait PowHasher {
    /// X11 digest of `data`.
    fn x11(&self, data: &[u8]) -> Hash32;
    /// X13 digest of `data` in `mode`.
    fn x13(&self, data: &[u8], mode: X13Mode) -> Hash32;
}

/// Algorithm for a header carrying `time`.
pub fn select_pow_algorithm(params: &NetworkParams, time: u32) -> PowAlgorithm {
    if time > params.digishield_x11_time {
        PowAlgorithm::X11
    } else if time > params.pow_limit2_time {
        PowAlgorithm::X13(X13Mode::Compatible)
    } else {
        PowAlgorithm::X13(X13Mode::Legacy)
    }
}

/// PoW digest of `header`.
pub fn pow_hash<H: PowHasher + ?Sized>(
    params: &NetworkParams,
    header: &BlockHeader,
    hasher: &H,
) -> Result<Hash32, ConsensusError> {
    let bytes = header_bytes(header)
        .map_err(|_| ConsensusError::InvalidHeader("header encoding failed"))?;
    Ok(match select_pow_algorithm(params, header.time) {
        PowAlgorithm::X11 => hasher.x11(&bytes),
        PowAlgorithm::X13(mode) => hasher.x13(&bytes, mode),
    })
}
