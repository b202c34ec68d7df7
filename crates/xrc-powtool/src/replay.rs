//! Replays a stored chain through the difficulty and spacing rules.
//!
//! PoW digests are not recomputed; X11/X13 live outside this tool.

use thiserror::Error;
use tracing::debug;
use xrc_consensus::{
    check_difficulty_bits, required_target, validate_time_spacing, ConsensusError, HeaderChain,
    NetworkParams,
};

/// First header that failed a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("header at height {height} rejected: {error}")]
pub struct ReplayFailure {
    /// Height of the rejected header.
    pub height: u32,
    /// Rule that rejected it.
    pub error: ConsensusError,
}

/// Check every header that has its parent in `chain`, in height order.
///
/// Returns how many headers were checked. The first header of the chain has no
/// parent in view and is taken as given.
pub fn replay(params: &NetworkParams, chain: &HeaderChain) -> Result<u32, ReplayFailure> {
    let (Some(tip_height), Some(first)) = (chain.tip_height(), chain.base_height().checked_add(1))
    else {
        return Ok(0);
    };

    let mut checked = 0;
    for height in first..=tip_height {
        let (Some(prev), Some(candidate)) = (chain.at(height - 1), chain.at(height)) else {
            break;
        };
        let header = candidate.header();
        let reject = move |error| ReplayFailure { height, error };

        let required = required_target(params, Some(prev), header.time).map_err(reject)?;
        check_difficulty_bits(&required, header).map_err(reject)?;
        validate_time_spacing(header, prev.header()).map_err(reject)?;

        debug!(height, bits = header.bits, "header accepted");
        checked += 1;
    }
    Ok(checked)
}
