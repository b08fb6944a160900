//! wgpu render backend for the glyph viewer.
//!
//! Uploads the static scene once, then draws it each frame with ambient
//! plus point-light shading and a depth buffer.
//!
//! # Invariants
//! - The backend never mutates scene or camera state.
//! - Scene geometry is uploaded once; only per-frame uniforms change.
//! - Surface loss is reported as a recoverable draw error, never a panic.

mod gpu;
mod shaders;

pub use gpu::WgpuBackend;
