#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! XRC consensus rules for PoW headers.
//!
//! This crate is responsible for:
//! - compact difficulty target encoding/decoding (Bitcoin-style `bits`)
//! - the required target at each height across the Original, DigiShield V1
//!   and DigiShield V2 retarget regimes
//! - PoW algorithm selection (X11 / X13) by header time
//! - header acceptance rules: proof-of-work, required bits, minimum spacing
//!
//! It does not store headers, hash with X11/X13 itself, or talk to peers.
//! Callers hand in a read-only [`AncestorView`] and a [`PowHasher`].

pub mod chain;
pub mod difficulty;
pub mod error;
pub mod median_time;
pub mod params;
pub mod pow;
pub mod retarget;
pub mod validate;

pub use chain::*;
pub use difficulty::*;
pub use error::*;
pub use median_time::*;
pub use params::*;
pub use pow::*;
pub use retarget::*;
pub use validate::*;
