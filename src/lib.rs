//! segdisp - segmented alphanumeric display renderer
//!
//! Draws a grid of 16-segment character cells (vacuum fluorescent display
//! look) into an RGBA pixel buffer.
//!
//! ```text
//! ShapeLibrary ──> CellGeometry ──> SegmentAtlas ──> FrameCompositor ──> surface
//!  (17 SVGs)       (cell size,      (one raster      (background,
//!                   skew, grid)      per segment)     silhouettes, lit
//!                                                     segments per cell)
//! ```
//!
//! Each cell's content is a 16-bit mask where bit j lights segment j.

pub mod config;
pub mod constants;
pub mod display;
pub mod drawing;
pub mod error;
pub mod shapes;
pub mod snapshot;
pub mod utils;

pub use display::{DisplaySettings, FpsCounter, FrameObserver, HostSurface, OwnedSurface, SegmentDisplay};
pub use drawing::{CellGeometry, DisplayFrame, FrameCompositor, GridLayout, SegmentAtlas};
pub use error::{ConfigurationError, LoadError, RenderError, StaleStateError};
pub use shapes::{SegmentMask, ShapeLibrary};
pub use utils::Rgba;
