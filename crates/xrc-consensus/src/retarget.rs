// Consensus-critical. Changes require review + tests.
//! Required-target computation.
//!
//! Three historical regimes are live on the chain, selected by height:
//!
//! - **Original**: Bitcoin-style retarget once per interval, with the
//!   min-difficulty exception for networks that allow it.
//! - **DigiShield V1**: per-block retarget over a 50-block window using
//!   average-of-extremes times, dampened by 1/4 and bounded.
//! - **DigiShield V2**: same shape over 16 blocks with wider bounds. Scheduled
//!   by its own activation height; mainnet leaves it unscheduled.
//!
//! Results are rounded through the compact codec so they compare equal to the
//! bits a valid header carries.

use crate::chain::{AncestorView, HeaderCursor};
use crate::difficulty::Target;
use crate::error::ConsensusError;
use crate::median_time::{average_time_past, MEDIAN_TIME_SPAN, MEDIAN_TIME_SPAN_V2};
use crate::params::NetworkParams;
use tracing::{debug, error};

/// Fixed target for the first DigiShield V1 blocks on mainnet (compact `0x1b01a61a`).
const DIGISHIELD_BOOTSTRAP_TARGET: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xa6, 0x1a, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Retarget regime in force at a height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Height 0.
    Genesis,
    /// First block after the PowLimit2 era: jumps to the post-fork floor.
    PowLimitStep,
    /// Interval-based retarget.
    Original,
    /// DigiShield V1.
    DigiShieldV1,
    /// DigiShield V2.
    DigiShieldV2,
}

/// Pick the regime for `height`. First match wins.
pub fn select_regime(height: u32, params: &NetworkParams) -> Regime {
    if height == 0 {
        Regime::Genesis
    } else if params.pow_limit2_height.checked_add(1) == Some(height) {
        Regime::PowLimitStep
    } else if height > params.digishield_x11_v2_height {
        Regime::DigiShieldV2
    } else if height > params.digishield_x11_height {
        Regime::DigiShieldV1
    } else {
        Regime::Original
    }
}

/// Window, spacing and bounds of one DigiShield variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigiShield {
    /// Blocks between the two sampled points.
    pub averaging_window: u32,
    /// Expected seconds per block inside the window.
    pub target_spacing: u32,
    /// Percent below the averaging timespan the adjusted timespan may fall.
    pub max_adjust_up: i64,
    /// Percent above the averaging timespan the adjusted timespan may rise.
    pub max_adjust_down: i64,
    /// Headers sampled by each average-time-past.
    pub median_time_span: u32,
    /// Whether the early blocks use the fixed bootstrap target.
    pub bootstrap: bool,
}

/// DigiShield V1: 50 blocks, bounds 92%..116%.
pub const DIGISHIELD_V1: DigiShield = DigiShield {
    averaging_window: 50,
    target_spacing: 10 * 60,
    max_adjust_up: 8,
    max_adjust_down: 16,
    median_time_span: MEDIAN_TIME_SPAN,
    bootstrap: true,
};

/// DigiShield V2: 16 blocks, bounds 20%..180%.
pub const DIGISHIELD_V2: DigiShield = DigiShield {
    averaging_window: 16,
    target_spacing: 10 * 60,
    max_adjust_up: 80,
    max_adjust_down: 80,
    median_time_span: MEDIAN_TIME_SPAN_V2,
    bootstrap: false,
};

impl DigiShield {
    /// Expected seconds across the window.
    pub fn averaging_timespan(&self) -> i64 {
        i64::from(self.averaging_window) * i64::from(self.target_spacing)
    }

    /// Lower bound of the adjusted timespan.
    pub fn min_timespan(&self) -> i64 {
        self.averaging_timespan() * (100 - self.max_adjust_up) / 100
    }

    /// Upper bound of the adjusted timespan.
    pub fn max_timespan(&self) -> i64 {
        self.averaging_timespan() * (100 + self.max_adjust_down) / 100
    }
}

/// Target required of the block that follows `prev` and carries `candidate_time`.
///
/// `prev == None` means the candidate is genesis. The candidate height is
/// `prev.height() + 1`.
pub fn required_target<V: AncestorView + ?Sized>(
    params: &NetworkParams,
    prev: Option<HeaderCursor<'_, V>>,
    candidate_time: u32,
) -> Result<Target, ConsensusError> {
    let Some(prev) = prev else {
        return Ok(params.pow_limit2.clone());
    };
    let height = prev
        .height()
        .checked_add(1)
        .ok_or(ConsensusError::InvalidHeader("height overflow"))?;

    let regime = select_regime(height, params);
    let target = match regime {
        Regime::Genesis => Ok(params.pow_limit2.clone()),
        Regime::PowLimitStep => Ok(params.pow_limit.clone()),
        Regime::Original => original_target(params, height, prev, candidate_time),
        Regime::DigiShieldV1 => digishield_target(params, &DIGISHIELD_V1, height, prev),
        Regime::DigiShieldV2 => digishield_target(params, &DIGISHIELD_V2, height, prev),
    }
    .inspect_err(|err| {
        if err.is_contract_violation() {
            error!(
                target: "xrc_consensus::contract",
                height,
                error = %err,
                "chain view handed to difficulty engine is incomplete"
            );
        }
    })?;

    debug!(height, ?regime, bits = target.to_compact(), "required target");
    Ok(target)
}

/// Compact bits a block template built on `tip` must carry.
pub fn next_block_bits<V: AncestorView + ?Sized>(
    params: &NetworkParams,
    tip: HeaderCursor<'_, V>,
    time: u32,
) -> Result<u32, ConsensusError> {
    required_target(params, Some(tip), time).map(|target| target.to_compact())
}

fn original_target<V: AncestorView + ?Sized>(
    params: &NetworkParams,
    height: u32,
    prev: HeaderCursor<'_, V>,
    candidate_time: u32,
) -> Result<Target, ConsensusError> {
    let floor = params.era_floor(height);
    let interval = params.difficulty_adjustment_interval();

    // Only change once per interval.
    if height % interval != 0 {
        if !params.allow_min_difficulty_blocks {
            return Target::from_compact(prev.bits());
        }

        // A block slower than two spacings may be mined at the floor.
        let slow_after = u64::from(prev.time()) + 2 * u64::from(params.target_spacing);
        if u64::from(candidate_time) > slow_after {
            return Ok(floor.clone());
        }
        return last_regular_target(prev, interval, floor);
    }

    let first = prev.require_ancestor(height - interval)?;

    if params.no_retargeting {
        return Target::from_compact(prev.bits());
    }

    let timespan = i64::from(params.target_timespan);
    let actual = (i64::from(prev.time()) - i64::from(first.time()))
        .clamp(timespan / 4, timespan * 4);

    Ok(Target::from_compact(prev.bits())?
        .multiply(actual.unsigned_abs())
        .divide(timespan.unsigned_abs())
        .clamp_to(floor)
        .normalized())
}

/// Bits of the nearest ancestor not mined under the min-difficulty exception.
fn last_regular_target<V: AncestorView + ?Sized>(
    prev: HeaderCursor<'_, V>,
    interval: u32,
    floor: &Target,
) -> Result<Target, ConsensusError> {
    let mut cursor = prev;
    loop {
        let target = Target::from_compact(cursor.bits())?;
        if cursor.height() % interval == 0 || target != *floor {
            return Ok(target);
        }
        match cursor.parent()? {
            Some(parent) => cursor = parent,
            None => return Ok(target),
        }
    }
}

fn digishield_target<V: AncestorView + ?Sized>(
    params: &NetworkParams,
    shield: &DigiShield,
    height: u32,
    prev: HeaderCursor<'_, V>,
) -> Result<Target, ConsensusError> {
    if shield.bootstrap
        && params.digishield_bootstrap()
        && height.saturating_sub(params.digishield_x11_height)
            <= shield.averaging_window + shield.median_time_span
    {
        return Ok(Target::from_be_bytes(&DIGISHIELD_BOOTSTRAP_TARGET));
    }

    let first_height = height
        .checked_sub(shield.averaging_window)
        .ok_or(ConsensusError::MissingAncestor { height: 0 })?;
    let first = prev.require_ancestor(first_height)?;

    let averaging = shield.averaging_timespan();
    let actual = average_time_past(prev, shield.median_time_span)?
        - average_time_past(first, shield.median_time_span)?;

    // Dampen towards the expected span; floor division keeps the legacy rounding.
    let adjusted = (averaging + (actual - averaging).div_euclid(4))
        .clamp(shield.min_timespan(), shield.max_timespan());

    Ok(Target::from_compact(prev.bits())?
        .multiply(adjusted.unsigned_abs())
        .divide(averaging.unsigned_abs())
        .clamp_to(&params.pow_limit2)
        .normalized())
}
