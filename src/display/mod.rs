//! Segment display state
//!
//! Ties the render core together for a host render loop:
//!
//! ```text
//! resize(w, h) ──> CellGeometry ──> SegmentAtlas ──┐
//!                                                  ├─> draw(surface)
//! update_frame(frame) ─────────────────────────────┘
//! ```
//!
//! Geometry and atlas are built together into a [`RenderState`] and swapped
//! in as one `Arc`, so a reader holding the previous state always sees a
//! complete, consistent pair.

pub mod stats;
pub mod surface;

use std::sync::Arc;

use log::{debug, info};
use resvg::tiny_skia::PixmapMut;

use crate::drawing::{CellGeometry, DisplayFrame, FrameCompositor, GridLayout, SegmentAtlas};
use crate::error::{RenderError, StaleStateError};
use crate::shapes::ShapeLibrary;
use crate::utils::color::Rgba;

pub use stats::{FpsCounter, FrameObserver};
pub use surface::{HostSurface, OwnedSurface, SurfaceLock};

/// Everything that affects rendering except the canvas size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySettings {
    pub layout: GridLayout,
    /// Lit segment color
    pub foreground: Rgba,
    /// Dim silhouette color
    pub segment_background: Rgba,
    /// Canvas clear color
    pub background: Rgba,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            layout: GridLayout::default(),
            foreground: Rgba::opaque(0xff, 0x45, 0x00),
            segment_background: Rgba::new(0xff, 0xff, 0xff, 0x1d),
            background: Rgba::opaque(0, 0, 0),
        }
    }
}

/// Geometry and the atlas rasterized for it
#[derive(Debug)]
pub struct RenderState {
    /// Bumped on every rebuild
    pub generation: u64,
    pub geometry: CellGeometry,
    pub atlas: SegmentAtlas,
}

/// Stateful segment display renderer
pub struct SegmentDisplay {
    library: ShapeLibrary,
    settings: DisplaySettings,
    compositor: FrameCompositor,
    state: Option<Arc<RenderState>>,
    frame: Option<DisplayFrame>,
    generation: u64,
    observer: Option<Box<dyn FrameObserver>>,
}

impl SegmentDisplay {
    pub fn new(library: ShapeLibrary, settings: DisplaySettings) -> Self {
        Self {
            library,
            compositor: FrameCompositor::new(settings.background),
            settings,
            state: None,
            frame: None,
            generation: 0,
            observer: None,
        }
    }

    /// Report rendered frames to `observer`
    pub fn with_observer(mut self, observer: Box<dyn FrameObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Current render state (None until the first resize)
    pub fn state(&self) -> Option<Arc<RenderState>> {
        self.state.clone()
    }

    /// Frame length the current layout expects
    pub fn cell_count(&self) -> usize {
        self.settings.layout.cell_count()
    }

    /// Recompute geometry and rebuild the atlas for a new canvas size.
    ///
    /// A no-op when the size is unchanged. On error the previous state is
    /// kept untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<Arc<RenderState>, RenderError> {
        if let Some(state) = &self.state {
            if state.geometry.matches_canvas(width, height) {
                debug!("Resize to {}x{} skipped (unchanged)", width, height);
                return Ok(Arc::clone(state));
            }
        }
        let (geometry, atlas) = self.build(&self.settings, width, height)?;
        Ok(self.commit(geometry, atlas))
    }

    /// Apply new settings, rebuilding the atlas at the current size.
    ///
    /// Settings, clear color and render state change together: if the
    /// rebuild fails the display keeps everything it had.
    pub fn reconfigure(&mut self, settings: DisplaySettings) -> Result<(), RenderError> {
        let rebuilt = match &self.state {
            Some(state) => Some(self.build(
                &settings,
                state.geometry.canvas_width,
                state.geometry.canvas_height,
            )?),
            None => None,
        };

        self.settings = settings;
        self.compositor = FrameCompositor::new(settings.background);
        if let Some((geometry, atlas)) = rebuilt {
            self.commit(geometry, atlas);
        }
        Ok(())
    }

    fn build(
        &self,
        settings: &DisplaySettings,
        width: u32,
        height: u32,
    ) -> Result<(CellGeometry, SegmentAtlas), RenderError> {
        let geometry = CellGeometry::compute(
            width,
            height,
            &settings.layout,
            self.library.reference_bounds(),
        )?;
        let atlas = SegmentAtlas::build(
            &self.library,
            &geometry,
            settings.foreground,
            settings.segment_background,
        )?;
        Ok((geometry, atlas))
    }

    fn commit(&mut self, geometry: CellGeometry, atlas: SegmentAtlas) -> Arc<RenderState> {
        self.generation += 1;
        let state = Arc::new(RenderState {
            generation: self.generation,
            geometry,
            atlas,
        });
        // Old rasters are released here once no reader holds them
        self.state = Some(Arc::clone(&state));

        info!(
            "Display resized to {}x{} (generation {}, cell {:.1}x{:.1})",
            geometry.canvas_width,
            geometry.canvas_height,
            self.generation,
            geometry.cell_width,
            geometry.cell_height
        );
        state
    }

    /// Store the frame to show on the next draw
    pub fn update_frame(&mut self, frame: DisplayFrame) {
        self.frame = Some(frame);
    }

    pub fn frame(&self) -> Option<&DisplayFrame> {
        self.frame.as_ref()
    }

    /// Composite the latest frame into a locked host surface.
    ///
    /// Stale-state errors leave the surface contents alone; the lock is
    /// released on every path.
    pub fn draw<S: HostSurface + ?Sized>(&mut self, surface: &mut S) -> Result<(), RenderError> {
        let (width, height) = surface.size();
        let mut lock = SurfaceLock::new(surface);
        let pixels = lock.pixels_mut();
        let len = pixels.len();
        let mut dst = PixmapMut::from_bytes(pixels, width, height).ok_or(
            StaleStateError::InvalidBuffer {
                width,
                height,
                len,
            },
        )?;
        self.draw_into(&mut dst)?;
        lock.mark_dirty(0, 0, width, height);
        Ok(())
    }

    /// Composite the latest frame into a raw destination pixmap
    pub fn draw_into(&mut self, dst: &mut PixmapMut<'_>) -> Result<(), StaleStateError> {
        let state = self.state.as_ref().ok_or(StaleStateError::NoAtlas)?;
        let frame = self.frame.as_ref().ok_or(StaleStateError::NoFrame)?;

        if let Err(e) = self
            .compositor
            .composite(&state.atlas, &state.geometry, frame, dst)
        {
            debug!("Skipping frame: {}", e);
            return Err(e);
        }

        if let Some(observer) = self.observer.as_mut() {
            observer.frame_rendered();
        }
        Ok(())
    }
}
