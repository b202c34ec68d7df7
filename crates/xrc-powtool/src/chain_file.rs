//! JSON chain files.
//!
//! ```json
//! { "base_height": 0,
//!   "headers": [ { "version": 1, "prev": "<64 hex>", "merkle_root": "<64 hex>",
//!                  "time": 1523716000, "bits": "1d00ffff", "nonce": 0 } ] }
//! ```
//!
//! `base_height`, `version`, `prev`, `merkle_root` and `nonce` may be omitted.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use xrc_consensus::HeaderChain;
use xrc_core::{BlockHeader, Hash32};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChainFile {
    #[serde(default)]
    base_height: u32,
    headers: Vec<HeaderEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HeaderEntry {
    #[serde(default)]
    version: i32,
    #[serde(default)]
    prev: Option<String>,
    #[serde(default)]
    merkle_root: Option<String>,
    time: u32,
    bits: String,
    #[serde(default)]
    nonce: u32,
}

impl HeaderEntry {
    fn into_header(self) -> Result<BlockHeader> {
        Ok(BlockHeader {
            version: self.version,
            prev: parse_hash(self.prev.as_deref()).context("prev")?,
            merkle_root: parse_hash(self.merkle_root.as_deref()).context("merkle_root")?,
            time: self.time,
            bits: parse_bits(&self.bits)?,
            nonce: self.nonce,
        })
    }
}

fn parse_hash(s: Option<&str>) -> Result<Hash32> {
    match s {
        None => Ok(Hash32::zero()),
        Some(s) => s.parse().map_err(|e| anyhow!("invalid hash '{s}': {e}")),
    }
}

/// Parse compact bits written as up to 8 hex digits, `0x` optional.
pub fn parse_bits(s: &str) -> Result<u32> {
    let digits = s.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    if digits.is_empty() || digits.len() > 8 {
        bail!("invalid compact bits '{s}': expected 1 to 8 hex digits");
    }
    u32::from_str_radix(digits, 16).with_context(|| format!("invalid compact bits '{s}'"))
}

/// Parse a chain from JSON text.
pub fn parse_chain(json: &str) -> Result<HeaderChain> {
    let file: ChainFile = serde_json::from_str(json)?;
    let Some(extra) = file.headers.len().checked_sub(1) else {
        bail!("chain file has no headers");
    };
    u32::try_from(extra)
        .ok()
        .and_then(|extra| file.base_height.checked_add(extra))
        .ok_or_else(|| anyhow!("chain heights overflow u32"))?;

    let headers = file
        .headers
        .into_iter()
        .enumerate()
        .map(|(i, entry)| entry.into_header().with_context(|| format!("header #{i}")))
        .collect::<Result<Vec<_>>>()?;
    Ok(HeaderChain::with_base(file.base_height, headers))
}

/// Read and parse a chain file.
pub fn load_chain(path: &Path) -> Result<HeaderChain> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_chain(&data).with_context(|| format!("parsing {}", path.display()))
}
