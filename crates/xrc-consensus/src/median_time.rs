// Consensus-critical. Changes require review + tests.
//! Windowed "average of extremes" time used by DigiShield.
//!
//! Despite the legacy "median" naming this is not a statistical median: it is
//! the midpoint between the earliest and latest timestamp in the window.

use crate::chain::{AncestorView, HeaderCursor};
use crate::error::ConsensusError;

/// Window used by DigiShield V1.
pub const MEDIAN_TIME_SPAN: u32 = 11;

/// Window used by DigiShield V2.
pub const MEDIAN_TIME_SPAN_V2: u32 = 5;

/// Midpoint of the earliest and latest timestamps among `header` and up to
/// `window - 1` of its predecessors.
///
/// The window shrinks near genesis; a zero window counts as one. A gap in
/// the view above genesis is a `MissingAncestor`.
pub fn average_time_past<V: AncestorView + ?Sized>(
    header: HeaderCursor<'_, V>,
    window: u32,
) -> Result<i64, ConsensusError> {
    let window = window.max(1) as usize;
    let mut times = Vec::with_capacity(window);
    let mut cursor = header;
    loop {
        times.push(i64::from(cursor.time()));
        if times.len() >= window {
            break;
        }
        match cursor.parent()? {
            Some(prev) => cursor = prev,
            None => break,
        }
    }

    times.sort_unstable();
    let first = times[0];
    let last = times[times.len() - 1];
    Ok(first + (last - first) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::HeaderChain;
    use xrc_core::BlockHeader;

    fn chain_with_times(times: &[u32]) -> HeaderChain {
        HeaderChain::new(
            times
                .iter()
                .map(|&time| BlockHeader {
                    time,
                    ..BlockHeader::default()
                })
                .collect(),
        )
    }

    #[test]
    fn midpoint_of_extremes_not_median() {
        // Window of 5 over [100, 101, 102, 103, 200]: median would be 102.
        let chain = chain_with_times(&[0, 100, 101, 102, 103, 200]);
        let tip = chain.tip().unwrap();
        assert_eq!(average_time_past(tip, 5).unwrap(), 150);
    }

    #[test]
    fn unsorted_timestamps_are_sorted_first() {
        let chain = chain_with_times(&[50, 90, 10, 70]);
        assert_eq!(average_time_past(chain.tip().unwrap(), 4).unwrap(), 50);
    }

    #[test]
    fn odd_span_truncates() {
        let chain = chain_with_times(&[10, 13]);
        assert_eq!(average_time_past(chain.tip().unwrap(), 11).unwrap(), 11);
    }

    #[test]
    fn window_shrinks_at_genesis() {
        let chain = chain_with_times(&[1_000, 1_600, 2_200]);
        assert_eq!(average_time_past(chain.tip().unwrap(), 11).unwrap(), 1_600);
        assert_eq!(average_time_past(chain.at(0).unwrap(), 11).unwrap(), 1_000);
    }

    #[test]
    fn gap_above_genesis_is_missing_ancestor() {
        let chain = HeaderChain::with_base(
            20,
            vec![BlockHeader::default(), BlockHeader::default()],
        );
        assert_eq!(
            average_time_past(chain.tip().unwrap(), 5),
            Err(ConsensusError::MissingAncestor { height: 19 })
        );
        // A window that stays inside the segment is fine.
        assert_eq!(average_time_past(chain.tip().unwrap(), 2), Ok(0));
    }
}
