//! Utility functions shared across segdisp
//!
//! Color parsing helpers.

pub mod color;

pub use color::{parse_hex_color, Rgba};
