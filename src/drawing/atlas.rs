//! Segment atlas
//!
//! Pre-rasterizes every segment shape (and the silhouette) at the current
//! cell geometry: skewed, scaled and tinted, on a transparent background.
//! This is the only place vector rendering happens; per-frame work is pure
//! pixmap blits.

use log::{debug, info};
use resvg::tiny_skia::{BlendMode, Paint, Pixmap, Rect, Shader, Transform};

use crate::constants::SEGMENT_COUNT;
use crate::drawing::geometry::{skew_tan, CellGeometry};
use crate::error::ConfigurationError;
use crate::shapes::{SegmentShape, ShapeLibrary};
use crate::utils::color::Rgba;

/// Rasterized segments for one geometry
#[derive(Clone)]
pub struct SegmentAtlas {
    /// Index = mask bit
    segments: [Pixmap; SEGMENT_COUNT],
    /// Dim full-glyph underlay
    silhouette: Pixmap,
    /// Geometry the rasters were produced for
    geometry: CellGeometry,
}

impl SegmentAtlas {
    /// Rasterize all 17 shapes for `geometry`.
    ///
    /// Segments are tinted with `foreground`, the silhouette with
    /// `background_dim`. Alpha coverage comes from the source shape.
    pub fn build(
        library: &ShapeLibrary,
        geometry: &CellGeometry,
        foreground: Rgba,
        background_dim: Rgba,
    ) -> Result<Self, ConfigurationError> {
        let transform = shape_transform(geometry);

        let mut segments = Vec::with_capacity(SEGMENT_COUNT);
        for shape in library.segments() {
            segments.push(rasterize(shape, geometry, transform, foreground)?);
        }
        let silhouette = rasterize(library.silhouette(), geometry, transform, background_dim)?;

        let segments: [Pixmap; SEGMENT_COUNT] = segments.try_into().map_err(|_: Vec<Pixmap>| {
            ConfigurationError::Degenerate("segment count mismatch".to_string())
        })?;

        info!(
            "Segment atlas built: {} segments + silhouette at {}x{}",
            SEGMENT_COUNT, geometry.raster_width, geometry.raster_height
        );

        Ok(Self {
            segments,
            silhouette,
            geometry: *geometry,
        })
    }

    /// Assemble an atlas from surfaces already rendered for `geometry`
    pub fn from_parts(
        geometry: CellGeometry,
        segments: [Pixmap; SEGMENT_COUNT],
        silhouette: Pixmap,
    ) -> Self {
        Self {
            segments,
            silhouette,
            geometry,
        }
    }

    /// Geometry the rasters were produced for
    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    /// Whether these rasters can be stamped into a grid laid out by `geometry`
    pub fn fits(&self, geometry: &CellGeometry) -> bool {
        self.geometry.same_raster(geometry)
            && self.raster_size() == (geometry.raster_width, geometry.raster_height)
    }

    pub fn segment(&self, index: usize) -> Option<&Pixmap> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[Pixmap; SEGMENT_COUNT] {
        &self.segments
    }

    pub fn silhouette(&self) -> &Pixmap {
        &self.silhouette
    }

    /// Raster surface size shared by every entry
    pub fn raster_size(&self) -> (u32, u32) {
        (self.silhouette.width(), self.silhouette.height())
    }
}

impl std::fmt::Debug for SegmentAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.raster_size();
        f.debug_struct("SegmentAtlas")
            .field("segments", &SEGMENT_COUNT)
            .field("raster", &format_args!("{}x{}", w, h))
            .finish()
    }
}

/// Shape units -> raster pixels.
///
/// Applied to points right to left: scale, then skew, then shift right by
/// the overhang so the slanted glyph stays inside the surface.
pub fn shape_transform(geometry: &CellGeometry) -> Transform {
    Transform::from_translate(geometry.skew_offset(), 0.0)
        .pre_concat(Transform::from_skew(skew_tan(geometry.skew_angle), 0.0))
        .pre_scale(geometry.scale, geometry.scale)
}

/// Render one shape into a fresh transparent surface and tint it
fn rasterize(
    shape: &SegmentShape,
    geometry: &CellGeometry,
    transform: Transform,
    color: Rgba,
) -> Result<Pixmap, ConfigurationError> {
    let mut pixmap = Pixmap::new(geometry.raster_width, geometry.raster_height).ok_or_else(|| {
        ConfigurationError::Degenerate(format!(
            "cannot allocate {}x{} raster for {}",
            geometry.raster_width,
            geometry.raster_height,
            shape.name()
        ))
    })?;

    resvg::render(shape.tree(), transform, &mut pixmap.as_mut());
    tint_source_in(&mut pixmap, color);

    debug!("Rasterized {} ({}x{})", shape.name(), pixmap.width(), pixmap.height());
    Ok(pixmap)
}

/// Replace every pixel's color with `color`, keeping the pixel's coverage.
///
/// Source-in fill over the whole surface: `out = color * dst_alpha`.
pub fn tint_source_in(pixmap: &mut Pixmap, color: Rgba) {
    let Some(rect) = Rect::from_xywh(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32)
    else {
        return;
    };
    let paint = Paint {
        shader: Shader::SolidColor(color.to_color()),
        blend_mode: BlendMode::SourceIn,
        anti_alias: false,
        ..Paint::default()
    };
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::geometry::GridLayout;
    use resvg::tiny_skia::PremultipliedColorU8;

    const ORANGE: Rgba = Rgba::opaque(255, 69, 0);
    const DIM: Rgba = Rgba::new(255, 255, 255, 0x1d);

    fn setup() -> (ShapeLibrary, CellGeometry) {
        let lib = ShapeLibrary::builtin().unwrap();
        let g = CellGeometry::compute(800, 300, &GridLayout::default(), lib.reference_bounds())
            .unwrap();
        (lib, g)
    }

    #[test]
    fn test_rasters_match_geometry() {
        let (lib, g) = setup();
        let atlas = SegmentAtlas::build(&lib, &g, ORANGE, DIM).unwrap();
        assert_eq!(atlas.raster_size(), (g.raster_width, g.raster_height));
        for seg in atlas.segments() {
            assert_eq!((seg.width(), seg.height()), (g.raster_width, g.raster_height));
        }
    }

    #[test]
    fn test_every_segment_has_ink() {
        let (lib, g) = setup();
        let atlas = SegmentAtlas::build(&lib, &g, ORANGE, DIM).unwrap();
        for (i, seg) in atlas.segments().iter().enumerate() {
            assert!(
                seg.pixels().iter().any(|p| p.alpha() > 0),
                "segment {} rendered empty",
                i
            );
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let (lib, g) = setup();
        let a = SegmentAtlas::build(&lib, &g, ORANGE, DIM).unwrap();
        let b = SegmentAtlas::build(&lib, &g, ORANGE, DIM).unwrap();
        for (x, y) in a.segments().iter().zip(b.segments()) {
            assert_eq!(x.data(), y.data());
        }
        assert_eq!(a.silhouette().data(), b.silhouette().data());
    }

    #[test]
    fn test_segments_tinted_foreground() {
        let (lib, g) = setup();
        let atlas = SegmentAtlas::build(&lib, &g, ORANGE, DIM).unwrap();
        let top = atlas.segment(0).unwrap();
        let solid = top
            .pixels()
            .iter()
            .find(|p| p.alpha() == 255)
            .expect("top bar has fully covered pixels");
        assert_eq!((solid.red(), solid.green(), solid.blue()), (255, 69, 0));
    }

    #[test]
    fn test_silhouette_is_dim() {
        let (lib, g) = setup();
        let atlas = SegmentAtlas::build(&lib, &g, ORANGE, DIM).unwrap();
        let max_alpha = atlas
            .silhouette()
            .pixels()
            .iter()
            .map(|p| p.alpha())
            .max()
            .unwrap_or(0);
        assert_eq!(max_alpha, 0x1d);
    }

    #[test]
    fn test_skewed_glyph_stays_inside_raster() {
        // The silhouette spans the whole document; its ink should reach both
        // the left and right thirds of the raster without being cut off.
        let (lib, g) = setup();
        let atlas = SegmentAtlas::build(&lib, &g, ORANGE, DIM).unwrap();
        let sil = atlas.silhouette();
        let w = sil.width() as usize;
        let mut min_x = w;
        let mut max_x = 0;
        for (i, p) in sil.pixels().iter().enumerate() {
            if p.alpha() > 0 {
                min_x = min_x.min(i % w);
                max_x = max_x.max(i % w);
            }
        }
        assert!(min_x < w / 3);
        assert!(max_x > 2 * w / 3);
    }

    #[test]
    fn test_tint_preserves_coverage() {
        let mut pm = Pixmap::new(2, 1).unwrap();
        pm.pixels_mut()[0] = PremultipliedColorU8::from_rgba(128, 128, 128, 128).unwrap();
        tint_source_in(&mut pm, Rgba::opaque(255, 0, 0));
        let p = pm.pixels()[0];
        assert!(p.alpha().abs_diff(128) <= 1);
        assert!(p.red().abs_diff(p.alpha()) <= 1);
        assert_eq!((p.green(), p.blue()), (0, 0));
        assert_eq!(pm.pixels()[1].alpha(), 0);
    }
}
