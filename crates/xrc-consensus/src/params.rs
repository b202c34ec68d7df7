//! Network consensus parameters.
//!
//! Parameters are plain immutable values built once per network definition and
//! passed by reference into every computation.

use crate::difficulty::Target;
use core::fmt;
use core::str::FromStr;
use xrc_core::{POW_TARGET_SPACING_SECS, POW_TARGET_TIMESPAN_SECS};

/// Mainnet floor after the PowLimit2 hard fork (compact `0x1b092489`).
const MAINNET_POW_LIMIT: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x09, 0x24, 0x89, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Mainnet genesis-era floor (compact `0x1d00ffff`).
const MAINNET_POW_LIMIT2: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0,
];

/// Testnet genesis-era floor (compact `0x1e0fffff`).
const TESTNET_POW_LIMIT2: [u8; 32] = [
    0x00, 0x00, 0x0f, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0,
];

/// Regtest floor for both eras (compact `0x207fffff`).
const REGTEST_POW_LIMIT: [u8; 32] = [
    0x7f, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0,
];

/// Height that never activates.
pub const NEVER: u32 = u32::MAX;

/// Which network a parameter set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkKind {
    /// Production network.
    Mainnet,
    /// Public test network.
    Testnet,
    /// Local regression-test network.
    Regtest,
}

/// Unknown network name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network '{0}' (expected mainnet, testnet or regtest)")]
pub struct UnknownNetwork(pub String);

impl FromStr for NetworkKind {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkKind::Mainnet),
            "testnet" | "test" => Ok(NetworkKind::Testnet),
            "regtest" => Ok(NetworkKind::Regtest),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NetworkKind::Mainnet => "mainnet",
            NetworkKind::Testnet => "testnet",
            NetworkKind::Regtest => "regtest",
        })
    }
}

/// Consensus parameters that drive difficulty selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    /// Network these parameters are defined for.
    pub kind: NetworkKind,
    /// Difficulty floor above `pow_limit2_height`.
    pub pow_limit: Target,
    /// Difficulty floor for genesis, the early era, and DigiShield.
    pub pow_limit2: Target,
    /// Span of one retarget interval, in seconds.
    pub target_timespan: u32,
    /// Expected time between blocks, in seconds.
    pub target_spacing: u32,
    /// Whether slow blocks may fall back to the floor between boundaries.
    pub allow_min_difficulty_blocks: bool,
    /// Whether boundary retargets keep the previous bits.
    pub no_retargeting: bool,
    /// Last height of the PowLimit2 era.
    pub pow_limit2_height: u32,
    /// Last timestamp hashed with X13 in legacy mode.
    pub pow_limit2_time: u32,
    /// DigiShield V1 applies to heights above this.
    pub digishield_x11_height: u32,
    /// DigiShield V2 applies to heights above this.
    pub digishield_x11_v2_height: u32,
    /// Headers with a later timestamp are hashed with X11.
    pub digishield_x11_time: u32,
}

impl NetworkParams {
    /// Mainnet parameters. DigiShield V2 is not scheduled.
    pub fn mainnet() -> Self {
        Self {
            kind: NetworkKind::Mainnet,
            pow_limit: Target::from_be_bytes(&MAINNET_POW_LIMIT),
            pow_limit2: Target::from_be_bytes(&MAINNET_POW_LIMIT2),
            target_timespan: POW_TARGET_TIMESPAN_SECS,
            target_spacing: POW_TARGET_SPACING_SECS,
            allow_min_difficulty_blocks: false,
            no_retargeting: false,
            pow_limit2_height: 1_648,
            pow_limit2_time: 1_541_879_606,
            digishield_x11_height: 136_135,
            digishield_x11_v2_height: NEVER,
            digishield_x11_time: 1_570_104_000,
        }
    }

    /// Testnet parameters.
    pub fn testnet() -> Self {
        Self {
            kind: NetworkKind::Testnet,
            pow_limit: Target::from_be_bytes(&MAINNET_POW_LIMIT2),
            pow_limit2: Target::from_be_bytes(&TESTNET_POW_LIMIT2),
            target_timespan: POW_TARGET_TIMESPAN_SECS,
            target_spacing: POW_TARGET_SPACING_SECS,
            allow_min_difficulty_blocks: true,
            no_retargeting: false,
            pow_limit2_height: 10,
            pow_limit2_time: 1_541_000_000,
            digishield_x11_height: 1_000,
            digishield_x11_v2_height: 2_000,
            digishield_x11_time: 1_560_000_000,
        }
    }

    /// Regtest parameters: floors everywhere, no retargeting.
    pub fn regtest() -> Self {
        Self {
            kind: NetworkKind::Regtest,
            pow_limit: Target::from_be_bytes(&REGTEST_POW_LIMIT),
            pow_limit2: Target::from_be_bytes(&REGTEST_POW_LIMIT),
            target_timespan: POW_TARGET_TIMESPAN_SECS,
            target_spacing: POW_TARGET_SPACING_SECS,
            allow_min_difficulty_blocks: true,
            no_retargeting: true,
            pow_limit2_height: 0,
            pow_limit2_time: 0,
            digishield_x11_height: 100,
            digishield_x11_v2_height: 200,
            digishield_x11_time: 0,
        }
    }

    /// Parameters for `kind`.
    pub fn for_kind(kind: NetworkKind) -> Self {
        match kind {
            NetworkKind::Mainnet => Self::mainnet(),
            NetworkKind::Testnet => Self::testnet(),
            NetworkKind::Regtest => Self::regtest(),
        }
    }

    /// Blocks between Original-regime retargets.
    pub fn difficulty_adjustment_interval(&self) -> u32 {
        (self.target_timespan / self.target_spacing.max(1)).max(1)
    }

    /// Difficulty floor of the era `height` belongs to.
    pub fn era_floor(&self, height: u32) -> &Target {
        if height > self.pow_limit2_height {
            &self.pow_limit
        } else {
            &self.pow_limit2
        }
    }

    /// Whether DigiShield V1 starts from the fixed anchor target (mainnet coin type only).
    pub fn digishield_bootstrap(&self) -> bool {
        self.kind == NetworkKind::Mainnet
    }
}
