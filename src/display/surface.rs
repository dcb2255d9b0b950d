//! Host surfaces
//!
//! The bitmap we draw into belongs to the host (window toolkit, framebuffer,
//! test harness). Hosts that need locking get it through [`SurfaceLock`],
//! which unlocks on drop so an early return never leaves the buffer locked.

use std::ops::{Deref, DerefMut};
use std::path::Path;

use anyhow::Result;

/// Caller-owned pixel buffer (RGBA8, premultiplied, stride = width * 4)
pub trait HostSurface {
    /// Size in pixels
    fn size(&self) -> (u32, u32);

    /// Acquire exclusive access to the back buffer
    fn lock(&mut self) {}

    /// Release the back buffer
    fn unlock(&mut self) {}

    /// Back buffer bytes; only valid while locked
    fn pixels_mut(&mut self) -> &mut [u8];

    /// Report a region that changed
    fn mark_dirty(&mut self, _x: u32, _y: u32, _width: u32, _height: u32) {}
}

/// Scoped lock on a host surface
pub struct SurfaceLock<'a, S: HostSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: HostSurface + ?Sized> SurfaceLock<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.lock();
        Self { surface }
    }
}

impl<S: HostSurface + ?Sized> Deref for SurfaceLock<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: HostSurface + ?Sized> DerefMut for SurfaceLock<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: HostSurface + ?Sized> Drop for SurfaceLock<'_, S> {
    fn drop(&mut self) {
        self.surface.unlock();
    }
}

/// In-memory surface, used by the CLI and tests
#[derive(Debug, Clone)]
pub struct OwnedSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    locked: bool,
    dirty: Option<(u32, u32, u32, u32)>,
}

impl OwnedSurface {
    /// Transparent surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            locked: false,
            dirty: None,
        }
    }

    /// Premultiplied RGBA bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[i..i + 4]);
        Some(px)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Last region reported through `mark_dirty`
    pub fn dirty_rect(&self) -> Option<(u32, u32, u32, u32)> {
        self.dirty
    }

    /// Save as PNG
    pub fn save_png(&self, path: &Path) -> Result<()> {
        crate::snapshot::save_png(path, &self.data, self.width, self.height)
    }
}

impl HostSurface for OwnedSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn lock(&mut self) {
        self.locked = true;
    }

    fn unlock(&mut self) {
        self.locked = false;
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn mark_dirty(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.dirty = Some((x, y, width, height));
    }
}
