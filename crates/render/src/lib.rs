//! Backend-agnostic rendering: the frame loop driver and the viewport
//! resize handler, plus the backend trait both are written against.
//!
//! # Invariants
//! - The driver issues exactly one draw attempt per tick while running,
//!   and none after `stop`.
//! - A failed draw is logged and counted; it never halts the frame
//!   sequence.
//! - A resize updates the camera projection before the backend surface,
//!   so the next tick always draws with a consistent aspect ratio.

pub mod backend;
pub mod driver;
pub mod resize;

pub use backend::{HeadlessBackend, RenderBackend, RenderError};
pub use driver::{FrameLoop, TickOutcome};
pub use resize::{ResizeOutcome, ViewportHandler};
