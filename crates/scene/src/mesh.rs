use bytemuck::{Pod, Zeroable};

/// Vertex with position and normal, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexPN {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangle mesh in CPU memory.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<VertexPN>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds, or None for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;
        for v in &self.vertices[1..] {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }
        Some((min, max))
    }
}

/// Axis-aligned cube centered on the origin.
pub fn cube(size: f32) -> MeshData {
    let p = size / 2.0;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        VertexPN { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        VertexPN { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        VertexPN { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        VertexPN { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        VertexPN { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        VertexPN { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        VertexPN { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        VertexPN { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        VertexPN { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        VertexPN { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        VertexPN { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        VertexPN { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        VertexPN { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        VertexPN { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        VertexPN { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        VertexPN { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        VertexPN { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        VertexPN { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        VertexPN { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        VertexPN { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        VertexPN { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        VertexPN { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        VertexPN { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        VertexPN { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u32> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_quad_faces() {
        let mesh = cube(0.5);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn cube_bounds_match_size() {
        let mesh = cube(0.5);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [-0.25, -0.25, -0.25]);
        assert_eq!(max, [0.25, 0.25, 0.25]);
    }

    #[test]
    fn cube_normals_are_unit_length() {
        let mesh = cube(2.0);
        for v in &mesh.vertices {
            let n = glam::Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let mesh = MeshData::default();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }
}
