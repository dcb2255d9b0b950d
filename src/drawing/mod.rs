//! Segment display drawing
//!
//! This module provides the render core:
//! - Cell geometry from canvas size and grid shape
//! - Segment atlas (pre-rasterized, skewed, tinted shapes)
//! - Frame compositing into a caller-owned pixel buffer
//!
//! Geometry and atlas change only on resize; compositing runs every frame.

pub mod atlas;
pub mod compositor;
pub mod frame;
pub mod geometry;

// Re-export commonly used types
pub use atlas::SegmentAtlas;
pub use compositor::FrameCompositor;
pub use frame::{DisplayFrame, ParseFrameError};
pub use geometry::{CellGeometry, GridLayout};
