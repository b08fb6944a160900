use glam::Vec3;
use glyphstage_common::Color;
use serde::{Deserialize, Serialize};

/// Uniform fill light with no position or falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.5,
        }
    }
}

/// Point light with distance falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Distance beyond which the light contributes nothing.
    pub range: f32,
    pub position: Vec3,
}

impl PointLight {
    pub fn new(color: Color, intensity: f32, range: f32, position: Vec3) -> Self {
        Self {
            color,
            intensity,
            range,
            position,
        }
    }
}
