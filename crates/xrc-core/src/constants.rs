//! Protocol-wide constants for the XRC chain.

/// Length in bytes of a 32-byte hash.
pub const HASH32_LEN: usize = 32;

/// Length in bytes of a canonically encoded block header.
pub const BLOCK_HEADER_LEN: usize = 80;

/// Expected block spacing in seconds (10 minutes).
pub const POW_TARGET_SPACING_SECS: u32 = 10 * 60;

/// Span covered by one retarget interval in seconds (two weeks).
pub const POW_TARGET_TIMESPAN_SECS: u32 = 14 * 24 * 60 * 60;
