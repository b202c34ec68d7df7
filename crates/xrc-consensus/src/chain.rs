//! Read-only ancestry access.
//!
//! The rules never own headers. Callers expose one ancestry path through
//! [`AncestorView`] and the rules walk it with [`HeaderCursor`].

use crate::error::ConsensusError;
use xrc_core::BlockHeader;

/// One ancestry path of already-accepted headers, indexed by height.
pub trait AncestorView {
    /// Header at `height` on this path, if the view holds it.
    fn header_at(&self, height: u32) -> Option<&BlockHeader>;
}

/// A header located in an [`AncestorView`].
pub struct HeaderCursor<'a, V: AncestorView + ?Sized> {
    view: &'a V,
    height: u32,
    header: &'a BlockHeader,
}

impl<'a, V: AncestorView + ?Sized> Clone for HeaderCursor<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V: AncestorView + ?Sized> Copy for HeaderCursor<'a, V> {}

impl<'a, V: AncestorView + ?Sized> HeaderCursor<'a, V> {
    /// Cursor at `height`, if the view holds that header.
    pub fn new(view: &'a V, height: u32) -> Option<Self> {
        view.header_at(height).map(|header| Self {
            view,
            height,
            header,
        })
    }

    /// Height of this header.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Timestamp of this header.
    pub fn time(&self) -> u32 {
        self.header.time
    }

    /// Compact bits of this header.
    pub fn bits(&self) -> u32 {
        self.header.bits
    }

    /// The header itself.
    pub fn header(&self) -> &'a BlockHeader {
        self.header
    }

    /// Predecessor, or `None` at genesis or when the view does not reach it.
    pub fn previous(&self) -> Option<Self> {
        let height = self.height.checked_sub(1)?;
        Self::new(self.view, height)
    }

    /// Predecessor, distinguishing genesis (`Ok(None)`) from a gap in the view.
    pub fn parent(&self) -> Result<Option<Self>, ConsensusError> {
        match self.height.checked_sub(1) {
            None => Ok(None),
            Some(height) => Self::new(self.view, height)
                .map(Some)
                .ok_or(ConsensusError::MissingAncestor { height }),
        }
    }

    /// Header at `height` on this path; `None` above this header or outside the view.
    pub fn ancestor(&self, height: u32) -> Option<Self> {
        if height > self.height {
            return None;
        }
        Self::new(self.view, height)
    }

    /// Like [`Self::ancestor`], failing with `MissingAncestor`.
    pub fn require_ancestor(&self, height: u32) -> Result<Self, ConsensusError> {
        self.ancestor(height)
            .ok_or(ConsensusError::MissingAncestor { height })
    }
}

impl<'a, V: AncestorView + ?Sized> core::fmt::Debug for HeaderCursor<'a, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HeaderCursor")
            .field("height", &self.height)
            .field("time", &self.header.time)
            .field("bits", &format_args!("0x{:08x}", self.header.bits))
            .finish()
    }
}

impl AncestorView for [BlockHeader] {
    fn header_at(&self, height: u32) -> Option<&BlockHeader> {
        self.get(usize::try_from(height).ok()?)
    }
}

impl AncestorView for Vec<BlockHeader> {
    fn header_at(&self, height: u32) -> Option<&BlockHeader> {
        self.as_slice().header_at(height)
    }
}

/// Contiguous in-memory chain segment starting at `base_height`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderChain {
    base_height: u32,
    headers: Vec<BlockHeader>,
}

impl HeaderChain {
    /// Chain starting at genesis.
    pub fn new(headers: Vec<BlockHeader>) -> Self {
        Self::with_base(0, headers)
    }

    /// Segment whose first header sits at `base_height`.
    pub fn with_base(base_height: u32, headers: Vec<BlockHeader>) -> Self {
        Self {
            base_height,
            headers,
        }
    }

    /// Height of the first header held.
    pub fn base_height(&self) -> u32 {
        self.base_height
    }

    /// Number of headers held.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// True when no header is held.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Append a header above the tip.
    pub fn push(&mut self, header: BlockHeader) {
        self.headers.push(header);
    }

    /// Height of the last header held.
    pub fn tip_height(&self) -> Option<u32> {
        let len = u32::try_from(self.headers.len()).ok()?;
        len.checked_sub(1)
            .and_then(|offset| self.base_height.checked_add(offset))
    }

    /// Cursor at the tip.
    pub fn tip(&self) -> Option<HeaderCursor<'_, Self>> {
        self.at(self.tip_height()?)
    }

    /// Cursor at `height`.
    pub fn at(&self, height: u32) -> Option<HeaderCursor<'_, Self>> {
        HeaderCursor::new(self, height)
    }

    /// Headers held, lowest first.
    pub fn headers(&self) -> &[BlockHeader] {
        &self.headers
    }
}

impl AncestorView for HeaderChain {
    fn header_at(&self, height: u32) -> Option<&BlockHeader> {
        let offset = height.checked_sub(self.base_height)?;
        self.headers.header_at(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(time: u32) -> BlockHeader {
        BlockHeader {
            time,
            bits: 0x1d00_ffff,
            ..BlockHeader::default()
        }
    }

    #[test]
    fn cursor_walks_back_to_genesis() {
        let chain = HeaderChain::new((0..5).map(|i| header(1_000 + i)).collect());
        let tip = chain.tip().unwrap();
        assert_eq!(tip.height(), 4);
        assert_eq!(tip.time(), 1_004);
        assert_eq!(tip.previous().unwrap().time(), 1_003);
        assert_eq!(tip.ancestor(1).unwrap().time(), 1_001);
        assert!(tip.ancestor(5).is_none());

        let genesis = tip.ancestor(0).unwrap();
        assert!(genesis.previous().is_none());
        assert!(matches!(genesis.parent(), Ok(None)));
    }

    #[test]
    fn segment_reports_gaps_as_missing_ancestors() {
        let chain = HeaderChain::with_base(10, (0..3).map(|i| header(i)).collect());
        assert_eq!(chain.tip_height(), Some(12));
        let base = chain.at(10).unwrap();
        assert!(base.previous().is_none());
        assert_eq!(
            base.parent().unwrap_err(),
            ConsensusError::MissingAncestor { height: 9 }
        );
        assert_eq!(
            chain.tip().unwrap().require_ancestor(4).unwrap_err(),
            ConsensusError::MissingAncestor { height: 4 }
        );
        assert!(chain.at(9).is_none());
    }

    #[test]
    fn slices_are_views() {
        let headers: Vec<BlockHeader> = (0..3).map(|i| header(i * 10)).collect();
        let cursor = HeaderCursor::new(headers.as_slice(), 2).unwrap();
        assert_eq!(cursor.previous().unwrap().time(), 10);
        assert!(HeaderChain::default().tip().is_none());
    }
}
