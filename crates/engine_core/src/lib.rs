//! Core engine types shared by every Astronomy crate.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Frame clock and FPS measurement
//! - Axis-aligned bounding boxes for imported models

pub mod bounds;
pub mod time;

pub use bounds::*;
pub use time::*;
