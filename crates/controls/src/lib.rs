//! Camera manipulation: orbit around a target with damped interpolation.
//!
//! # Invariants
//! - Input events only accumulate pending deltas; camera state changes
//!   happen in `update`, exactly once per frame.
//! - Pitch stays strictly between the poles; distance stays positive.

pub mod orbit;

pub use orbit::OrbitControls;
