#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! XRC core: canonical header type, constants, and header byte encoding.

pub mod constants;
pub mod serialization;
pub mod types;

pub use constants::*;
pub use serialization::*;
pub use types::*;
