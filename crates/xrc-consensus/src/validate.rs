// Consensus-critical. Changes require review + tests.
//! Header acceptance rules that depend on difficulty and ancestry.
//!
//! Rules are pure functions of the candidate, a read-only chain view and the
//! network parameters. Headers on independent branches can be checked in
//! parallel; headers on one branch must be checked in order by the caller.

use crate::chain::{AncestorView, HeaderCursor};
use crate::difficulty::Target;
use crate::error::ConsensusError;
use crate::params::NetworkParams;
use crate::pow::{pow_hash, PowHasher};
use crate::retarget::required_target;
use tracing::trace;
use xrc_core::BlockHeader;

/// Minimum gap between a header and its predecessor.
pub const MIN_BLOCK_SPACING_SECS: u64 = 8 * 60;

/// Reject with `HighHash` unless the header's digest is at or below its claimed target.
///
/// Claimed bits that do not decode are also `HighHash`.
pub fn check_proof_of_work<H: PowHasher + ?Sized>(
    params: &NetworkParams,
    header: &BlockHeader,
    hasher: &H,
) -> Result<(), ConsensusError> {
    let Ok(target) = Target::from_compact(header.bits) else {
        trace!(bits = header.bits, "high-hash: claimed bits do not decode");
        return Err(ConsensusError::HighHash);
    };

    let hash = pow_hash(params, header, hasher)?;
    if !target.is_met_by(&hash) {
        trace!(%hash, bits = header.bits, "high-hash");
        return Err(ConsensusError::HighHash);
    }
    Ok(())
}

/// Reject with `BadDiffBits` unless the claimed bits decode to `required`.
///
/// Compares full integers, so an equal value in a different compact form passes.
pub fn check_difficulty_bits(required: &Target, header: &BlockHeader) -> Result<(), ConsensusError> {
    let matches = Target::from_compact(header.bits).is_ok_and(|claimed| claimed == *required);
    if !matches {
        let required = required.to_compact();
        trace!(required, claimed = header.bits, "bad-diff-bits");
        return Err(ConsensusError::BadDiffBits {
            required,
            claimed: header.bits,
        });
    }
    Ok(())
}

/// Proof-of-work, then required-bits check.
///
/// `prev == None` validates a genesis candidate.
pub fn validate_difficulty<V, H>(
    params: &NetworkParams,
    prev: Option<HeaderCursor<'_, V>>,
    header: &BlockHeader,
    hasher: &H,
) -> Result<(), ConsensusError>
where
    V: AncestorView + ?Sized,
    H: PowHasher + ?Sized,
{
    check_proof_of_work(params, header, hasher)?;
    let required = required_target(params, prev, header.time)?;
    check_difficulty_bits(&required, header)
}

/// Reject with `TimeTooNew` unless `candidate` is at least
/// [`MIN_BLOCK_SPACING_SECS`] after `previous`.
pub fn validate_time_spacing(
    candidate: &BlockHeader,
    previous: &BlockHeader,
) -> Result<(), ConsensusError> {
    let earliest = u64::from(previous.time) + MIN_BLOCK_SPACING_SECS;
    if u64::from(candidate.time) < earliest {
        trace!(time = candidate.time, earliest, "time-too-new");
        return Err(ConsensusError::TimeTooNew {
            time: candidate.time,
            earliest,
        });
    }
    Ok(())
}

/// All rules for a non-genesis header on top of `prev`.
pub fn validate_header<V, H>(
    params: &NetworkParams,
    prev: HeaderCursor<'_, V>,
    header: &BlockHeader,
    hasher: &H,
) -> Result<(), ConsensusError>
where
    V: AncestorView + ?Sized,
    H: PowHasher + ?Sized,
{
    validate_difficulty(params, Some(prev), header, hasher)?;
    validate_time_spacing(header, prev.header())
}
