//! Segment shape library
//!
//! Handles:
//! - Loading the 16 elemental segment shapes and the full-glyph silhouette
//! - Parsing SVG resources into vector trees (usvg)
//! - Reference bounds used for cell geometry
//!
//! The library is immutable once loaded and shared read-only by every
//! atlas rebuild.

pub mod mask;
pub mod source;

use log::{debug, info};
use resvg::usvg;

use crate::constants::{SEGMENT_COUNT, SEGMENT_NAMES, SILHOUETTE_NAME};
use crate::error::LoadError;

pub use mask::SegmentMask;
pub use source::{DirectoryShapes, EmbeddedShapes, ShapeSource};

/// Width/height of a shape document in its own units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeBounds {
    pub width: f32,
    pub height: f32,
}

/// One parsed vector shape
pub struct SegmentShape {
    name: String,
    tree: usvg::Tree,
}

impl SegmentShape {
    /// Parse an SVG document
    pub fn parse(name: &str, data: &[u8]) -> Result<Self, LoadError> {
        let tree = usvg::Tree::from_data(data, &usvg::Options::default()).map_err(|source| {
            LoadError::Malformed {
                name: name.to_string(),
                source,
            }
        })?;

        let size = tree.size();
        if !(size.width() > 0.0 && size.height() > 0.0) {
            return Err(LoadError::EmptyBounds {
                name: name.to_string(),
                width: size.width(),
                height: size.height(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            tree,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &usvg::Tree {
        &self.tree
    }

    /// Document size (the SVG viewport, not the ink extent)
    pub fn bounds(&self) -> ShapeBounds {
        let size = self.tree.size();
        ShapeBounds {
            width: size.width(),
            height: size.height(),
        }
    }
}

impl std::fmt::Debug for SegmentShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentShape")
            .field("name", &self.name)
            .field("bounds", &self.bounds())
            .finish()
    }
}

/// The fixed set of 16 segment shapes plus the silhouette
#[derive(Debug)]
pub struct ShapeLibrary {
    segments: [SegmentShape; SEGMENT_COUNT],
    silhouette: SegmentShape,
}

impl ShapeLibrary {
    /// Load all shapes from `source`.
    ///
    /// Fails on the first missing or malformed resource; no partial
    /// library is ever returned.
    pub fn load(source: &dyn ShapeSource) -> Result<Self, LoadError> {
        info!("Loading segment shapes from {}", source.describe());

        let mut segments = Vec::with_capacity(SEGMENT_COUNT);
        for name in SEGMENT_NAMES {
            let data = source.fetch(name)?;
            let shape = SegmentShape::parse(name, &data)?;
            debug!("Loaded shape {} ({:?})", name, shape.bounds());
            segments.push(shape);
        }

        let data = source.fetch(SILHOUETTE_NAME)?;
        let silhouette = SegmentShape::parse(SILHOUETTE_NAME, &data)?;

        let segments: [SegmentShape; SEGMENT_COUNT] = segments
            .try_into()
            .map_err(|_: Vec<SegmentShape>| LoadError::Missing("segment set".to_string()))?;

        info!("Loaded {} segment shapes + silhouette", SEGMENT_COUNT);
        Ok(Self {
            segments,
            silhouette,
        })
    }

    /// Load the shapes compiled into the binary
    pub fn builtin() -> Result<Self, LoadError> {
        Self::load(&EmbeddedShapes)
    }

    /// Elemental shapes, index = mask bit
    pub fn segments(&self) -> &[SegmentShape; SEGMENT_COUNT] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&SegmentShape> {
        self.segments.get(index)
    }

    pub fn silhouette(&self) -> &SegmentShape {
        &self.silhouette
    }

    /// Bounds every cell is sized from (shape 0's document size)
    pub fn reference_bounds(&self) -> ShapeBounds {
        self.segments[0].bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::collections::HashMap;

    /// In-memory source for exercising failure paths
    struct MapSource(HashMap<&'static str, Vec<u8>>);

    impl MapSource {
        fn from_embedded() -> Self {
            let mut map = HashMap::new();
            for name in SEGMENT_NAMES.iter().chain(std::iter::once(&SILHOUETTE_NAME)) {
                map.insert(*name, EmbeddedShapes.fetch(name).unwrap().into_owned());
            }
            Self(map)
        }
    }

    impl ShapeSource for MapSource {
        fn fetch(&self, name: &str) -> Result<Cow<'_, [u8]>, LoadError> {
            self.0
                .get(name)
                .map(|d| Cow::Borrowed(d.as_slice()))
                .ok_or_else(|| LoadError::Missing(name.to_string()))
        }

        fn describe(&self) -> String {
            "test map".to_string()
        }
    }

    #[test]
    fn test_builtin_loads_in_order() {
        let lib = ShapeLibrary::builtin().unwrap();
        for (i, shape) in lib.segments().iter().enumerate() {
            assert_eq!(shape.name(), SEGMENT_NAMES[i]);
        }
        assert_eq!(lib.silhouette().name(), SILHOUETTE_NAME);
    }

    #[test]
    fn test_reference_bounds() {
        let lib = ShapeLibrary::builtin().unwrap();
        let b = lib.reference_bounds();
        assert!((b.width - 64.0).abs() < 1e-3);
        assert!((b.height - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_missing_resource_fails_whole_load() {
        let mut source = MapSource::from_embedded();
        source.0.remove("09-center-top");
        match ShapeLibrary::load(&source) {
            Err(LoadError::Missing(name)) => assert_eq!(name, "09-center-top"),
            other => panic!("expected Missing, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_resource() {
        let mut source = MapSource::from_embedded();
        source.0.insert("full", b"<svg not really".to_vec());
        assert!(matches!(
            ShapeLibrary::load(&source),
            Err(LoadError::Malformed { .. })
        ));
    }
}
