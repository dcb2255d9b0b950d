//! Frame statistics
//!
//! Frame counting lives outside the renderer: the display reports each
//! rendered frame to an injected observer.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use log::debug;

use crate::constants::FPS_LOG_INTERVAL_FRAMES;

/// Notified after every successfully composited frame
pub trait FrameObserver {
    fn frame_rendered(&mut self);
}

impl<T: FrameObserver> FrameObserver for Rc<RefCell<T>> {
    fn frame_rendered(&mut self) {
        self.borrow_mut().frame_rendered();
    }
}

/// Frame counter with a running frames-per-second estimate
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u64,
    started: Option<Instant>,
    log_interval: u64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_log_interval(FPS_LOG_INTERVAL_FRAMES)
    }

    /// Log every `interval` frames (0 = never)
    pub fn with_log_interval(interval: u64) -> Self {
        Self {
            frames: 0,
            started: None,
            log_interval: interval,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average FPS since the first frame
    pub fn fps(&self) -> f64 {
        let Some(started) = self.started else {
            return 0.0;
        };
        let elapsed = started.elapsed().as_secs_f64();
        // Clock may not have advanced yet on very fast first frames
        let elapsed = if elapsed > 0.0 { elapsed } else { 1.0 };
        self.frames as f64 / elapsed
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameObserver for FpsCounter {
    fn frame_rendered(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        self.frames += 1;
        if self.log_interval > 0 && self.frames % self.log_interval == 0 {
            debug!("FPS: {:.0}, frames: {}", self.fps(), self.frames);
        }
    }
}
