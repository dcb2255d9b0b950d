//! Display frames
//!
//! One `u16` mask per cell, row-major. Frames are produced elsewhere
//! (character mapping is not our job); this type only carries and parses
//! them.

use std::ops::Deref;
use std::str::FromStr;

use crate::shapes::SegmentMask;

/// Snapshot of per-cell segment masks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayFrame {
    masks: Vec<u16>,
}

impl DisplayFrame {
    pub fn new(masks: Vec<u16>) -> Self {
        Self { masks }
    }

    /// All segments off
    pub fn blank(cells: usize) -> Self {
        Self {
            masks: vec![0; cells],
        }
    }

    pub fn masks(&self) -> &[u16] {
        &self.masks
    }

    /// Set one cell; out-of-range indices are ignored
    pub fn set(&mut self, cell: usize, mask: SegmentMask) {
        if let Some(slot) = self.masks.get_mut(cell) {
            *slot = mask.bits();
        }
    }

    pub fn get(&self, cell: usize) -> Option<SegmentMask> {
        self.masks.get(cell).copied().map(SegmentMask::from_bits_retain)
    }

    /// Pad with blank cells or truncate to exactly `cells` entries
    pub fn resized(mut self, cells: usize) -> Self {
        self.masks.resize(cells, 0);
        self
    }
}

impl Deref for DisplayFrame {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.masks
    }
}

impl From<Vec<u16>> for DisplayFrame {
    fn from(masks: Vec<u16>) -> Self {
        Self::new(masks)
    }
}

/// Error parsing a textual frame
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mask `{token}` at position {position}")]
pub struct ParseFrameError {
    pub token: String,
    pub position: usize,
}

/// Parse one mask word: `0x`-prefixed hex or decimal
fn parse_mask(token: &str) -> Option<u16> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16).ok()
    } else {
        token.parse().ok()
    }
}

impl FromStr for DisplayFrame {
    type Err = ParseFrameError;

    /// Words separated by whitespace and/or commas; `#` starts a comment
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut masks = Vec::new();
        let words = s
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
            .filter(|w| !w.is_empty());
        for (position, token) in words.enumerate() {
            let mask = parse_mask(token).ok_or_else(|| ParseFrameError {
                token: token.to_string(),
                position,
            })?;
            masks.push(mask);
        }
        Ok(Self { masks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_words() {
        let frame: DisplayFrame = "0x3f, 6\n0xFFFF  0 # trailing comment\n".parse().unwrap();
        assert_eq!(frame.masks(), &[0x3f, 6, 0xffff, 0]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "0x10 zz".parse::<DisplayFrame>().unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.token, "zz");
        assert!("70000".parse::<DisplayFrame>().is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut frame = DisplayFrame::blank(40);
        frame.set(3, SegmentMask::TOP | SegmentMask::DOT);
        frame.set(99, SegmentMask::all());
        assert_eq!(frame[3], 0x8001);
        assert_eq!(frame.get(3), Some(SegmentMask::TOP | SegmentMask::DOT));
        assert_eq!(frame.get(40), None);
        assert_eq!(frame.len(), 40);
    }

    #[test]
    fn test_resized() {
        let frame = DisplayFrame::new(vec![1, 2, 3]).resized(5);
        assert_eq!(frame.masks(), &[1, 2, 3, 0, 0]);
        assert_eq!(frame.resized(2).masks(), &[1, 2]);
    }
}
