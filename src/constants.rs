//! Global constants for segdisp
//!
//! Consolidates layout defaults, segment counts and shape resource names
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Segment Constants
// ============================================================================

/// Number of elemental segments per cell (one bit each in a cell mask)
pub const SEGMENT_COUNT: usize = 16;

/// Shape resource names in bit order.
/// Index `j` here is bit `j` of a cell mask, so the order is load-bearing.
pub const SEGMENT_NAMES: [&str; SEGMENT_COUNT] = [
    "00-top",
    "01-top-right",
    "02-bottom-right",
    "03-bottom",
    "04-bottom-left",
    "05-top-left",
    "06-middle-left",
    "07-comma",
    "08-diag-top-left",
    "09-center-top",
    "10-diag-top-right",
    "11-middle-right",
    "12-diag-bottom-right",
    "13-center-bottom",
    "14-diag-bottom-left",
    "15-dot",
];

/// Resource name of the full-glyph silhouette (dim background underlay)
pub const SILHOUETTE_NAME: &str = "full";

/// File extension of shape resources on disk
pub const SHAPE_EXTENSION: &str = "svg";

// ============================================================================
// Layout Defaults
// ============================================================================

/// Number of display lines in the reference layout
pub const DEFAULT_LINES: usize = 2;

/// Number of cells per line in the reference layout
pub const DEFAULT_CELLS_PER_LINE: usize = 20;

/// Horizontal skew of every glyph (degrees, negative leans right)
pub const DEFAULT_SKEW_ANGLE: f32 = -15.0;

/// Padding around the grid (pixels)
pub const DEFAULT_PADDING: f32 = 20.0;

/// Vertical gap between display lines (pixels)
pub const DEFAULT_ROW_GAP: f32 = 10.0;

/// Default canvas width (pixels)
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;

/// Default canvas height (pixels)
pub const DEFAULT_CANVAS_HEIGHT: u32 = 300;

/// Largest accepted skew magnitude (degrees), inclusive.
/// tan() diverges toward 90°.
pub const MAX_SKEW_ANGLE: f32 = 89.0;

// ============================================================================
// Color Defaults (RRGGBB / RRGGBBAA)
// ============================================================================

/// Lit segment color (OrangeRed)
pub const DEFAULT_FOREGROUND: &str = "ff4500";

/// Unlit silhouette color: white at low alpha
pub const DEFAULT_SEGMENT_BACKGROUND: &str = "ffffff1d";

/// Canvas background color
pub const DEFAULT_BACKGROUND: &str = "000000";

// ============================================================================
// Frame Statistics
// ============================================================================

/// How many frames between FPS log lines
pub const FPS_LOG_INTERVAL_FRAMES: u64 = 300;
