//! Cell geometry
//!
//! Derives per-cell scale, size and raster dimensions from the canvas size
//! and the fixed grid shape.
//!
//! # Sizing
//!
//! A skewed glyph is wider than its upright box by the horizontal overhang
//! `|tan(skew)| * height`. Only the last cell of a line needs room for that
//! overhang, since neighbors overlap into each other's slanted gap:
//!
//! ```text
//!  padding  cell 0   cell 1        cell n-1      padding
//!  |<--->|<------>|<------>| ... |<------>|<-->|<--->|
//!                                          overhang
//! ```
//!
//! so `width - 2*padding = cell_width * (n - 1 + skew_factor)` with
//! `skew_factor = skewed_width(ref) / ref_width`.

use log::{debug, warn};

use crate::error::ConfigurationError;
use crate::shapes::ShapeBounds;
use crate::constants::MAX_SKEW_ANGLE;

/// Fixed grid shape and spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Number of display lines
    pub lines: usize,
    /// Cells per line
    pub cells_per_line: usize,
    /// Horizontal skew in degrees (negative leans right)
    pub skew_angle: f32,
    /// Padding around the grid (pixels)
    pub padding: f32,
    /// Gap between lines (pixels)
    pub row_gap: f32,
}

impl GridLayout {
    /// Total number of cells (= required DisplayFrame length)
    pub fn cell_count(&self) -> usize {
        self.lines * self.cells_per_line
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            lines: DEFAULT_LINES,
            cells_per_line: DEFAULT_CELLS_PER_LINE,
            skew_angle: DEFAULT_SKEW_ANGLE,
            padding: DEFAULT_PADDING,
            row_gap: DEFAULT_ROW_GAP,
        }
    }
}

/// Layout parameters for one canvas size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    /// Horizontal advance between cells (unskewed glyph width)
    pub cell_width: f32,
    /// Glyph height
    pub cell_height: f32,
    /// Shape units -> pixels
    pub scale: f32,
    /// `skewed_width(ref) / ref_width`
    pub skew_factor: f32,
    pub skew_angle: f32,
    pub padding: f32,
    pub row_gap: f32,
    /// Raster surface size, overhang included
    pub raster_width: u32,
    pub raster_height: u32,
    /// Canvas this geometry was computed for
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub lines: usize,
    pub cells_per_line: usize,
}

/// tan() of an angle given in degrees
#[inline]
pub fn skew_tan(degrees: f32) -> f32 {
    (degrees.to_radians()).tan()
}

/// Width of a `width`×`height` box after horizontal skew
#[inline]
pub fn skewed_width(width: f32, height: f32, skew_angle: f32) -> f32 {
    width + (skew_tan(skew_angle) * height).abs()
}

impl CellGeometry {
    /// Compute the geometry that tiles `layout` exactly across `target_width`.
    ///
    /// Errors are raised before any rasterization so a bad config never
    /// produces half-built state.
    pub fn compute(
        target_width: u32,
        target_height: u32,
        layout: &GridLayout,
        reference: ShapeBounds,
    ) -> Result<Self, ConfigurationError> {
        if layout.cells_per_line <= 1 {
            return Err(ConfigurationError::TooFewCells(layout.cells_per_line));
        }
        if layout.lines == 0 {
            return Err(ConfigurationError::NoLines);
        }
        if !layout.skew_angle.is_finite() || layout.skew_angle.abs() > MAX_SKEW_ANGLE {
            return Err(ConfigurationError::SkewOutOfRange(layout.skew_angle));
        }
        if !(reference.width > 0.0 && reference.height > 0.0)
            || !reference.width.is_finite()
            || !reference.height.is_finite()
        {
            return Err(ConfigurationError::InvalidReference {
                width: reference.width,
                height: reference.height,
            });
        }

        for (name, value) in [("padding", layout.padding), ("row_gap", layout.row_gap)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidSpacing { name, value });
            }
        }

        let usable = target_width as f32 - 2.0 * layout.padding;
        if !(usable > 0.0) {
            return Err(ConfigurationError::NoUsableWidth {
                width: target_width,
                padding: layout.padding,
            });
        }

        let skew_factor = skewed_width(reference.width, reference.height, layout.skew_angle)
            / reference.width;
        let cell_width = usable / (layout.cells_per_line as f32 - 1.0 + skew_factor);
        let scale = cell_width / reference.width;
        let cell_height = reference.height * scale;
        let raster_w = skewed_width(cell_width, cell_height, layout.skew_angle).ceil();
        let raster_h = cell_height.ceil();

        if !cell_width.is_finite() || !cell_height.is_finite() || raster_w < 1.0 || raster_h < 1.0
        {
            return Err(ConfigurationError::Degenerate(format!(
                "cell {}x{} -> raster {}x{}",
                cell_width, cell_height, raster_w, raster_h
            )));
        }

        let geometry = Self {
            cell_width,
            cell_height,
            scale,
            skew_factor,
            skew_angle: layout.skew_angle,
            padding: layout.padding,
            row_gap: layout.row_gap,
            raster_width: raster_w as u32,
            raster_height: raster_h as u32,
            canvas_width: target_width,
            canvas_height: target_height,
            lines: layout.lines,
            cells_per_line: layout.cells_per_line,
        };

        debug!(
            "Cell geometry for {}x{}: cell={:.2}x{:.2}, scale={:.4}, raster={}x{}",
            target_width,
            target_height,
            cell_width,
            cell_height,
            scale,
            geometry.raster_width,
            geometry.raster_height
        );

        let grid_height = geometry.grid_height();
        if grid_height > target_height as f32 {
            warn!(
                "Grid height {:.0}px exceeds canvas height {}px; bottom lines will be clipped",
                grid_height, target_height
            );
        }

        Ok(geometry)
    }

    /// Number of cells a frame must carry
    pub fn cell_count(&self) -> usize {
        self.lines * self.cells_per_line
    }

    /// Horizontal offset that aligns the skewed shape's right edge with the
    /// raster's right edge. Only left-leaning (negative) skew needs it.
    pub fn skew_offset(&self) -> f32 {
        if self.skew_angle < 0.0 {
            self.raster_width as f32 - self.cell_width
        } else {
            0.0
        }
    }

    /// Top-left of cell (row, col) in canvas pixels, unrounded
    pub fn cell_origin(&self, row: usize, col: usize) -> (f32, f32) {
        (
            self.padding + col as f32 * self.cell_width,
            self.padding + row as f32 * (self.cell_height + self.row_gap),
        )
    }

    /// Cell origin snapped to whole pixels (where rasters are stamped)
    pub fn cell_position(&self, row: usize, col: usize) -> (i32, i32) {
        let (x, y) = self.cell_origin(row, col);
        (x.round() as i32, y.round() as i32)
    }

    /// Total grid width including padding (== canvas width up to rounding)
    pub fn grid_width(&self) -> f32 {
        2.0 * self.padding
            + self.cell_width * (self.cells_per_line as f32 - 1.0 + self.skew_factor)
    }

    /// Total grid height including padding
    pub fn grid_height(&self) -> f32 {
        2.0 * self.padding
            + self.lines as f32 * self.cell_height
            + (self.lines.saturating_sub(1)) as f32 * self.row_gap
    }

    /// Whether rasters made for `other` look identical to rasters made for
    /// this geometry (same scale, skew and raster size)
    pub fn same_raster(&self, other: &CellGeometry) -> bool {
        self.scale == other.scale
            && self.skew_angle == other.skew_angle
            && self.raster_width == other.raster_width
            && self.raster_height == other.raster_height
    }

    /// Whether this geometry was built for a canvas of this size
    pub fn matches_canvas(&self, width: u32, height: u32) -> bool {
        self.canvas_width == width && self.canvas_height == height
    }
}
