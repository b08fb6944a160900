use crate::light::{AmbientLight, PointLight};
use crate::material::Material;
use crate::mesh::{self, MeshData};
use crate::text;
use glam::Vec3;
use glyphstage_assets::Assets;
use glyphstage_common::{Color, Transform};

/// Errors from scene construction.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("glyph tessellation failed: {reason}")]
    Tessellation { reason: String },
}

/// A named mesh placed in the world, with an optional attached light.
///
/// An attached light's position is local to the node and follows its
/// transform.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: MeshData,
    pub material: Material,
    pub light: Option<PointLight>,
}

/// The static scene: built once, read by the renderer every frame.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    pub ambient: AmbientLight,
    pub lights: Vec<PointLight>,
    pub nodes: Vec<SceneNode>,
}

/// Aggregate counts for logging and headless inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    pub node_count: usize,
    pub triangle_count: usize,
    pub light_count: usize,
}

impl Scene {
    /// All point lights in world space: free lights plus node-attached
    /// lights with their positions run through the node transform.
    pub fn point_lights(&self) -> Vec<PointLight> {
        let mut lights = self.lights.clone();
        for node in &self.nodes {
            if let Some(attached) = node.light {
                lights.push(PointLight {
                    position: node.transform.matrix().transform_point3(attached.position),
                    ..attached
                });
            }
        }
        lights
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            node_count: self.nodes.len(),
            triangle_count: self.nodes.iter().map(|n| n.mesh.triangle_count()).sum(),
            light_count: self.point_lights().len(),
        }
    }
}

/// Build the glyph scene from loaded assets. Phase two of startup:
/// synchronous, deterministic, and infallible on I/O.
pub fn build_scene(assets: &Assets) -> Result<Scene, SceneError> {
    let face = assets.font.face();

    let glyph_text = text::extrude_text(&face, "N", 1.0, 0.5)?;
    let glyph_digit = text::extrude_text(&face, "7", 1.0, 0.5)?;

    let nodes = vec![
        SceneNode {
            name: "glyph_n".into(),
            transform: Transform::from_position(Vec3::new(-3.0, 0.0, 0.0)),
            mesh: glyph_text,
            material: Material::Glossy {
                color: Color::rgb(0.2, 0.8, 0.2),
                shininess: 50.0,
                specular: Color::WHITE,
            },
            light: None,
        },
        SceneNode {
            name: "glyph_7".into(),
            transform: Transform::from_position(Vec3::new(3.0, 0.0, 0.0)),
            mesh: glyph_digit,
            material: Material::Metallic {
                color: Color::rgb(0.8, 0.1, 0.7),
                metalness: 0.95,
                roughness: 0.1,
            },
            light: None,
        },
        SceneNode {
            name: "glow_cube".into(),
            transform: Transform::default(),
            mesh: mesh::cube(0.5),
            material: Material::Emissive {
                color: Color::WHITE,
                intensity: 1.0,
            },
            // The cube is itself a light source.
            light: Some(PointLight::new(Color::WHITE, 5.0, 10.0, Vec3::ZERO)),
        },
    ];

    let scene = Scene {
        background: Color::BLACK,
        ambient: AmbientLight {
            color: Color::WHITE,
            intensity: 0.5,
        },
        lights: vec![PointLight::new(
            Color::WHITE,
            3.0,
            100.0,
            Vec3::new(0.0, 3.0, 3.0),
        )],
        nodes,
    };

    let stats = scene.stats();
    tracing::info!(
        nodes = stats.node_count,
        triangles = stats.triangle_count,
        lights = stats.light_count,
        "scene built"
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scene() -> Scene {
        Scene {
            background: Color::BLACK,
            ambient: AmbientLight::default(),
            lights: vec![PointLight::new(
                Color::WHITE,
                3.0,
                100.0,
                Vec3::new(0.0, 3.0, 3.0),
            )],
            nodes: vec![SceneNode {
                name: "cube".into(),
                transform: Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
                mesh: mesh::cube(0.5),
                material: Material::Emissive {
                    color: Color::WHITE,
                    intensity: 1.0,
                },
                light: Some(PointLight::new(Color::WHITE, 5.0, 10.0, Vec3::ZERO)),
            }],
        }
    }

    #[test]
    fn attached_lights_follow_their_node() {
        let scene = test_scene();
        let lights = scene.point_lights();
        assert_eq!(lights.len(), 2);
        // The attached light sits at the node position, not the origin.
        assert_eq!(lights[1].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(lights[1].intensity, 5.0);
    }

    #[test]
    fn stats_count_nodes_triangles_lights() {
        let scene = test_scene();
        let stats = scene.stats();
        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.triangle_count, 12);
        assert_eq!(stats.light_count, 2);
    }

    #[test]
    fn free_lights_pass_through_unchanged() {
        let scene = test_scene();
        let lights = scene.point_lights();
        assert_eq!(lights[0].position, Vec3::new(0.0, 3.0, 3.0));
        assert_eq!(lights[0].range, 100.0);
    }
}
