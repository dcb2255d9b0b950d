//! Frame compositor
//!
//! Stamps pre-rasterized segments into the destination buffer:
//!
//! ```text
//! clear → silhouette pass (every cell) → segment pass (lit bits only)
//! ```
//!
//! Both passes walk cells in row-major order and bits in ascending order,
//! so output is reproducible pixel for pixel.

use log::trace;
use resvg::tiny_skia::{Color, PixmapMut, PixmapPaint, Transform};

use crate::constants::SEGMENT_COUNT;
use crate::drawing::atlas::SegmentAtlas;
use crate::drawing::geometry::CellGeometry;
use crate::error::StaleStateError;
use crate::utils::color::Rgba;

/// Composites display frames onto a caller-owned pixel buffer
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    background: Color,
    paint: PixmapPaint,
}

impl FrameCompositor {
    pub fn new(background: Rgba) -> Self {
        Self {
            background: background.to_color(),
            paint: PixmapPaint::default(),
        }
    }

    /// Render one frame.
    ///
    /// All preconditions are checked before the destination is touched: a
    /// stale call leaves the previous picture in place and returns an error
    /// the render loop can skip past.
    pub fn composite(
        &self,
        atlas: &SegmentAtlas,
        geometry: &CellGeometry,
        frame: &[u16],
        dst: &mut PixmapMut<'_>,
    ) -> Result<(), StaleStateError> {
        let expected = geometry.cell_count();
        if frame.len() != expected {
            return Err(StaleStateError::FrameLength {
                expected,
                actual: frame.len(),
            });
        }
        if !geometry.matches_canvas(dst.width(), dst.height()) {
            return Err(StaleStateError::BufferSize {
                expected_width: geometry.canvas_width,
                expected_height: geometry.canvas_height,
                actual_width: dst.width(),
                actual_height: dst.height(),
            });
        }
        if !atlas.fits(geometry) {
            return Err(StaleStateError::AtlasMismatch);
        }

        dst.fill(self.background);

        // Background pass: dim silhouette under every cell
        let silhouette = atlas.silhouette().as_ref();
        for row in 0..geometry.lines {
            for col in 0..geometry.cells_per_line {
                let (x, y) = geometry.cell_position(row, col);
                dst.draw_pixmap(x, y, silhouette, &self.paint, Transform::identity(), None);
            }
        }

        // Segment pass
        let mut stamped = 0usize;
        for (i, &mask) in frame.iter().enumerate() {
            if mask == 0 {
                continue;
            }
            let row = i / geometry.cells_per_line;
            let col = i % geometry.cells_per_line;
            let (x, y) = geometry.cell_position(row, col);
            for j in 0..SEGMENT_COUNT {
                if (mask >> j) & 1 != 0 {
                    let segment = atlas.segments()[j].as_ref();
                    dst.draw_pixmap(x, y, segment, &self.paint, Transform::identity(), None);
                    stamped += 1;
                }
            }
        }

        trace!("Composited {} cells, {} segments", expected, stamped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::geometry::GridLayout;
    use crate::shapes::ShapeBounds;
    use resvg::tiny_skia::{Pixmap, PremultipliedColorU8};

    const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    /// Tiny 2x3 grid with 16px cells and no skew so positions are exact
    fn tiny_geometry() -> CellGeometry {
        let layout = GridLayout {
            lines: 2,
            cells_per_line: 3,
            skew_angle: 0.0,
            padding: 2.0,
            row_gap: 2.0,
        };
        CellGeometry::compute(52, 40, &layout, ShapeBounds { width: 16.0, height: 16.0 }).unwrap()
    }

    /// Segment j lights exactly pixel (j, 0); silhouette lights pixel (0, 15)
    fn marker_atlas(geometry: &CellGeometry) -> SegmentAtlas {
        let blank = || Pixmap::new(geometry.raster_width, geometry.raster_height).unwrap();
        let red = PremultipliedColorU8::from_rgba(255, 0, 0, 255).unwrap();
        let gray = PremultipliedColorU8::from_rgba(20, 20, 20, 20).unwrap();
        let w = geometry.raster_width as usize;

        let segments: [Pixmap; SEGMENT_COUNT] = std::array::from_fn(|j| {
            let mut pm = blank();
            pm.pixels_mut()[j] = red;
            pm
        });
        let mut silhouette = blank();
        silhouette.pixels_mut()[15 * w] = gray;
        SegmentAtlas::from_parts(*geometry, segments, silhouette)
    }

    fn pixel(buf: &Pixmap, x: u32, y: u32) -> PremultipliedColorU8 {
        buf.pixel(x, y).unwrap()
    }

    #[test]
    fn test_tiny_geometry_is_exact() {
        let g = tiny_geometry();
        assert_eq!(g.cell_width, 16.0);
        assert_eq!((g.raster_width, g.raster_height), (16, 16));
        assert_eq!(g.cell_position(1, 2), (34, 20));
    }

    #[test]
    fn test_zero_frame_only_silhouettes() {
        let g = tiny_geometry();
        let atlas = marker_atlas(&g);
        let mut buf = Pixmap::new(52, 40).unwrap();
        FrameCompositor::new(BLACK)
            .composite(&atlas, &g, &[0; 6], &mut buf.as_mut())
            .unwrap();

        for row in 0..2 {
            for col in 0..3 {
                let (x, y) = g.cell_position(row, col);
                let p = pixel(&buf, x as u32, y as u32 + 15);
                assert!(p.red() > 0, "missing silhouette at cell ({}, {})", row, col);
            }
        }
        assert!(buf.pixels().iter().all(|p| p.red() < 100));
    }

    #[test]
    fn test_bits_map_to_segments() {
        let g = tiny_geometry();
        let atlas = marker_atlas(&g);
        let mut buf = Pixmap::new(52, 40).unwrap();
        let mut frame = [0u16; 6];
        frame[4] = 0b1000_0000_0000_0101; // segments 0, 2, 15 in row 1, col 1
        FrameCompositor::new(BLACK)
            .composite(&atlas, &g, &frame, &mut buf.as_mut())
            .unwrap();

        let (x, y) = g.cell_position(1, 1);
        let lit: Vec<u32> = (0..16)
            .filter(|&j| pixel(&buf, x as u32 + j, y as u32).red() == 255)
            .collect();
        assert_eq!(lit, vec![0, 2, 15]);

        let bright = buf.pixels().iter().filter(|p| p.red() == 255).count();
        assert_eq!(bright, 3);
    }

    #[test]
    fn test_full_mask_stays_in_its_cell() {
        let g = tiny_geometry();
        let atlas = marker_atlas(&g);
        let mut buf = Pixmap::new(52, 40).unwrap();
        let mut frame = [0u16; 6];
        frame[0] = 0xFFFF;
        FrameCompositor::new(BLACK)
            .composite(&atlas, &g, &frame, &mut buf.as_mut())
            .unwrap();

        let (x0, y0) = g.cell_position(0, 0);
        for (i, p) in buf.pixels().iter().enumerate() {
            if p.red() == 255 {
                let (x, y) = ((i % 52) as i32, (i / 52) as i32);
                assert_eq!(y, y0);
                assert!(x >= x0 && x < x0 + 16);
            }
        }
        assert_eq!(buf.pixels().iter().filter(|p| p.red() == 255).count(), 16);
    }

    #[test]
    fn test_short_frame_is_stale() {
        let g = tiny_geometry();
        let atlas = marker_atlas(&g);
        let mut buf = Pixmap::new(52, 40).unwrap();
        let err = FrameCompositor::new(BLACK)
            .composite(&atlas, &g, &[0xFFFF; 5], &mut buf.as_mut())
            .unwrap_err();
        assert_eq!(err, StaleStateError::FrameLength { expected: 6, actual: 5 });
        // Destination untouched
        assert!(buf.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_wrong_buffer_size_is_stale() {
        let g = tiny_geometry();
        let atlas = marker_atlas(&g);
        let mut buf = Pixmap::new(60, 40).unwrap();
        assert!(matches!(
            FrameCompositor::new(BLACK).composite(&atlas, &g, &[0; 6], &mut buf.as_mut()),
            Err(StaleStateError::BufferSize { .. })
        ));
    }

    #[test]
    fn test_atlas_from_other_geometry_is_stale() {
        let g = tiny_geometry();
        let mut other = g;
        other.raster_width = 8;
        let atlas = marker_atlas(&other);
        let mut buf = Pixmap::new(52, 40).unwrap();
        assert_eq!(
            FrameCompositor::new(BLACK).composite(&atlas, &g, &[0; 6], &mut buf.as_mut()),
            Err(StaleStateError::AtlasMismatch)
        );
    }

    #[test]
    fn test_atlas_at_other_scale_is_stale() {
        let g = tiny_geometry();
        let mut other = g;
        other.scale *= 0.97;
        // Same raster size, different content scale
        let atlas = marker_atlas(&other);
        assert_eq!(atlas.raster_size(), (g.raster_width, g.raster_height));
        let mut buf = Pixmap::new(52, 40).unwrap();
        assert_eq!(
            FrameCompositor::new(BLACK).composite(&atlas, &g, &[0; 6], &mut buf.as_mut()),
            Err(StaleStateError::AtlasMismatch)
        );
        assert!(buf.pixels().iter().all(|p| p.alpha() == 0));
    }
}
