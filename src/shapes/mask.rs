//! Named segment bits
//!
//! Cell masks arrive as plain `u16`; these flags name the bits so frames
//! can be assembled in code without memorizing the shape order.

use bitflags::bitflags;

use crate::constants::SEGMENT_COUNT;

bitflags! {
    /// Set of lit segments in one cell (bit j = shape j)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SegmentMask: u16 {
        const TOP = 1 << 0;
        const TOP_RIGHT = 1 << 1;
        const BOTTOM_RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;
        const BOTTOM_LEFT = 1 << 4;
        const TOP_LEFT = 1 << 5;
        const MIDDLE_LEFT = 1 << 6;
        const COMMA = 1 << 7;
        const DIAG_TOP_LEFT = 1 << 8;
        const CENTER_TOP = 1 << 9;
        const DIAG_TOP_RIGHT = 1 << 10;
        const MIDDLE_RIGHT = 1 << 11;
        const DIAG_BOTTOM_RIGHT = 1 << 12;
        const CENTER_BOTTOM = 1 << 13;
        const DIAG_BOTTOM_LEFT = 1 << 14;
        const DOT = 1 << 15;

        /// Both middle bars
        const MIDDLE = Self::MIDDLE_LEFT.bits() | Self::MIDDLE_RIGHT.bits();
    }
}

impl SegmentMask {
    /// Iterate lit segment indices in ascending order
    pub fn indices(self) -> impl Iterator<Item = usize> {
        let bits = self.bits();
        (0..SEGMENT_COUNT).filter(move |j| (bits >> j) & 1 != 0)
    }
}

impl From<SegmentMask> for u16 {
    fn from(mask: SegmentMask) -> Self {
        mask.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_ascending() {
        let mask = SegmentMask::DOT | SegmentMask::TOP | SegmentMask::MIDDLE;
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0, 6, 11, 15]);
    }

    #[test]
    fn test_all_bits() {
        assert_eq!(SegmentMask::all().bits(), 0xFFFF);
        assert_eq!(SegmentMask::all().indices().count(), 16);
    }
}
