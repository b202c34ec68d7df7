// Consensus-critical. Changes require review + tests.
//! Difficulty targets and the compact `bits` codec.
//!
//! Headers carry the target in Bitcoin-style "compact" form:
//! `bits = (exponent << 24) | mantissa`, where mantissa is 3 bytes and
//! the top mantissa bit (0x00800000) is a sign bit:
//!
//! - exponent = (bits >> 24) as u8
//! - mantissa = bits & 0x007fffff (sign bit set => rejected)
//!
//! Then: target = mantissa * 2^(8*(exponent-3)), shifting right when the
//! exponent is below 3.
//!
//! The codec is bit-exact with the 32-bit field in serialized headers. All
//! comparisons go through the full integer, never the compact bytes.

use crate::error::ConsensusError;
use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;
use xrc_core::Hash32;

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;
const MAX_TARGET_BITS: u64 = 256;

fn expand(bits: u32) -> BigUint {
    let exponent = (bits >> 24) as usize;
    let mant = BigUint::from(bits & MANTISSA_MASK);
    if exponent <= 3 {
        mant >> (8 * (3 - exponent))
    } else {
        mant << (8 * (exponent - 3))
    }
}

/// Decode compact `bits` to a full target.
///
/// Rejects encodings that are negative, zero, or at least 2^256.
pub fn bits_to_target(bits: u32) -> Result<BigUint, ConsensusError> {
    // Sign bit set in mantissa: a negative target, never valid.
    if bits & SIGN_BIT != 0 {
        return Err(ConsensusError::MalformedTarget(bits));
    }

    let target = expand(bits);
    if target.is_zero() || target.bits() > MAX_TARGET_BITS {
        return Err(ConsensusError::MalformedTarget(bits));
    }
    Ok(target)
}

/// Encode a full target into normalized compact `bits`.
///
/// Zero encodes as `0`. The mantissa keeps the three most significant bytes;
/// if its top bit would read as a sign bit it is shifted down one byte and the
/// exponent bumped.
pub fn target_to_bits(target: &BigUint) -> u32 {
    if target.is_zero() {
        return 0;
    }

    // Big-endian bytes without leading zeros; exponent is their count.
    let mut bytes = target.to_bytes_be();
    let mut exponent = bytes.len() as u32;
    bytes.resize(bytes.len().max(3), 0);
    let mut mantissa = (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]);

    if mantissa & SIGN_BIT != 0 {
        mantissa >>= 8;
        exponent += 1;
    }

    debug_assert!(exponent <= 0xff, "target too large for compact encoding");
    (exponent << 24) | mantissa
}

/// Returns `true` if a proof-of-work digest satisfies `target` (`hash <= target`).
///
/// Digests are little-endian 256-bit integers.
pub fn hash_meets_target(hash: &Hash32, target: &BigUint) -> bool {
    BigUint::from_bytes_le(hash.as_bytes()) <= *target
}

/// A 256-bit difficulty target. Smaller is harder.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Target(BigUint);

impl Target {
    /// Decode compact `bits`.
    pub fn from_compact(bits: u32) -> Result<Self, ConsensusError> {
        bits_to_target(bits).map(Self)
    }

    /// Build a target from 32 big-endian bytes, rounded to what compact bits can carry.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        Self(BigUint::from_bytes_be(bytes)).normalized()
    }

    /// Normalized compact encoding.
    pub fn to_compact(&self) -> u32 {
        target_to_bits(&self.0)
    }

    /// Full integer value.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Round down to the nearest value expressible in compact form.
    pub fn normalized(&self) -> Self {
        Self(expand(self.to_compact()))
    }

    /// Multiply by a scalar.
    pub fn multiply(&self, factor: u64) -> Self {
        Self(&self.0 * factor)
    }

    /// Integer division by a scalar (a zero divisor is treated as one).
    pub fn divide(&self, divisor: u64) -> Self {
        Self(&self.0 / divisor.max(1))
    }

    /// Cap at `max`.
    pub fn clamp_to(self, max: &Target) -> Self {
        if self > *max {
            max.clone()
        } else {
            self
        }
    }

    /// True if `hash` is at or below this target.
    pub fn is_met_by(&self, hash: &Hash32) -> bool {
        hash_meets_target(hash, &self.0)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target(0x{:08x})", self.to_compact())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064x}", self.0)
    }
}
