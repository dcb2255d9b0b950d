//! Error types
//!
//! Load and configuration errors are fatal at construction time.
//! Stale-state errors are recoverable: the render loop skips the frame
//! and retries on the next one.

use resvg::usvg;
use thiserror::Error;

/// A shape resource is missing or malformed
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("shape resource `{0}` not found")]
    Missing(String),

    #[error("failed to read shape resource `{name}`")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed shape resource `{name}`: {source}")]
    Malformed {
        name: String,
        #[source]
        source: usvg::Error,
    },

    #[error("shape resource `{name}` has degenerate bounds {width}x{height}")]
    EmptyBounds { name: String, width: f32, height: f32 },
}

/// Grid dimensions produce a degenerate or non-finite geometry
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("cells per line must be at least 2 (got {0})")]
    TooFewCells(usize),

    #[error("display must have at least one line")]
    NoLines,

    #[error("skew angle {0}° is outside the supported range")]
    SkewOutOfRange(f32),

    #[error("{name} must be a finite, non-negative length (got {value})")]
    InvalidSpacing { name: &'static str, value: f32 },

    #[error("canvas width {width} leaves no room inside {padding}px padding")]
    NoUsableWidth { width: u32, padding: f32 },

    #[error("reference shape bounds {width}x{height} are not positive")]
    InvalidReference { width: f32, height: f32 },

    #[error("computed geometry is degenerate: {0}")]
    Degenerate(String),
}

/// Composite invoked against missing or mismatched state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StaleStateError {
    #[error("no display frame received yet")]
    NoFrame,

    #[error("segment atlas has not been built")]
    NoAtlas,

    #[error("segment atlas was built for a different geometry")]
    AtlasMismatch,

    #[error("frame has {actual} cells, layout expects {expected}")]
    FrameLength { expected: usize, actual: usize },

    #[error("destination buffer of {len} bytes cannot hold {width}x{height} RGBA pixels")]
    InvalidBuffer { width: u32, height: u32, len: usize },

    #[error("destination is {actual_width}x{actual_height}, geometry was built for {expected_width}x{expected_height}")]
    BufferSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Any failure of the high-level display API
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    StaleState(#[from] StaleStateError),
}

impl RenderError {
    /// Whether the render loop can simply retry on the next frame
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::StaleState(_))
    }
}
