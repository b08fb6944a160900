//! Shared leaf types for the glyphstage viewer.
//!
//! # Invariants
//! - `Viewport` never carries a zero dimension; construction clamps.
//! - Colors are linear RGBA; conversion from hex happens once at the edge.

pub mod types;

pub use types::{Color, Transform, Viewport};
