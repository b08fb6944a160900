//! Scene graph for the glyph viewer: camera, lights, materials, meshes,
//! and the builder that assembles them from loaded assets.
//!
//! The scene is built once at startup and never mutated by the render
//! loop. Renderers read it; only the camera changes per frame, and that
//! is driven by the controls, not by anything in this crate.
//!
//! # Invariants
//! - `build_scene` is synchronous and deterministic for a given font.
//! - Camera projection parameters are derived on demand, so a projection
//!   matrix can never be stale relative to the stored aspect ratio.

pub mod builder;
pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod text;

pub use builder::{build_scene, Scene, SceneError, SceneNode, SceneStats};
pub use camera::PerspectiveCamera;
pub use light::{AmbientLight, PointLight};
pub use material::Material;
pub use mesh::{MeshData, VertexPN};
