use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Output surface dimensions in physical pixels.
///
/// Dimensions are clamped to at least 1 on construction so the aspect
/// ratio is always a finite positive number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// width / height of the surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Decode a 0xRRGGBB value into linear components.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_aspect_ratio() {
        let vp = Viewport::new(800, 600);
        assert_eq!(vp.aspect_ratio(), 800.0 / 600.0);
        let vp = Viewport::new(1600, 900);
        assert_eq!(vp.aspect_ratio(), 1600.0 / 900.0);
    }

    #[test]
    fn viewport_clamps_zero_dimensions() {
        let vp = Viewport::new(0, 0);
        assert_eq!(vp.width, 1);
        assert_eq!(vp.height, 1);
        assert!(vp.aspect_ratio().is_finite());
    }

    #[test]
    fn color_from_hex() {
        let c = Color::from_hex(0x000000);
        assert_eq!(c, Color::BLACK);
        let c = Color::from_hex(0xffffff);
        assert_eq!(c, Color::WHITE);
        let c = Color::from_hex(0xff0000);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.matrix(), glam::Mat4::IDENTITY);
    }

    #[test]
    fn transform_from_position_translates() {
        let t = Transform::from_position(Vec3::new(-3.0, 0.0, 0.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(-3.0, 0.0, 0.0));
    }
}
