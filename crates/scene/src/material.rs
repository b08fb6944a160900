use glyphstage_common::Color;
use serde::{Deserialize, Serialize};

/// Surface appearance parameters consumed by the render backend.
///
/// Three families cover the demo scene: a shiny dielectric, a rough/smooth
/// metal, and a self-lit surface. All are flat-shaded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Plastic-like: strong specular highlight, no metallic reflection.
    Glossy {
        color: Color,
        shininess: f32,
        specular: Color,
    },
    /// Metal: reflection strength from `metalness`, highlight spread from
    /// `roughness`.
    Metallic {
        color: Color,
        metalness: f32,
        roughness: f32,
    },
    /// Self-lit surface, unaffected by scene lights.
    Emissive { color: Color, intensity: f32 },
}

impl Material {
    /// Base color regardless of family.
    pub fn base_color(&self) -> Color {
        match *self {
            Material::Glossy { color, .. } => color,
            Material::Metallic { color, .. } => color,
            Material::Emissive { color, .. } => color,
        }
    }

    /// Emitted light, zero for non-emissive materials.
    pub fn emission(&self) -> Color {
        match *self {
            Material::Emissive { color, intensity } => Color {
                r: color.r * intensity,
                g: color.g * intensity,
                b: color.b * intensity,
                a: color.a,
            },
            _ => Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emission_is_zero_for_lit_materials() {
        let m = Material::Glossy {
            color: Color::rgb(0.2, 0.8, 0.2),
            shininess: 50.0,
            specular: Color::WHITE,
        };
        let e = m.emission();
        assert_eq!((e.r, e.g, e.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn emission_scales_with_intensity() {
        let m = Material::Emissive {
            color: Color::WHITE,
            intensity: 2.0,
        };
        let e = m.emission();
        assert_eq!((e.r, e.g, e.b), (2.0, 2.0, 2.0));
    }
}
