//! Extruded text meshes: glyph outlines tessellated into a front face,
//! a mirrored back face, and side walls along the flattened outline.

use crate::builder::SceneError;
use crate::mesh::{MeshData, VertexPN};
use lyon_path::math;
use lyon_path::Path;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};
use ttf_parser::{Face, OutlineBuilder};

/// Curve flattening tolerance for side walls, in em-scaled units.
const FLATTEN_TOLERANCE: f32 = 0.005;

/// Collects a glyph outline into a lyon path, scaled and offset.
struct OutlineSink<'a> {
    builder: &'a mut lyon_path::path::Builder,
    scale: f32,
    x_offset: f32,
}

impl OutlineBuilder for OutlineSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder
            .begin(math::point(self.x_offset + x * self.scale, y * self.scale));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder
            .line_to(math::point(self.x_offset + x * self.scale, y * self.scale));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quadratic_bezier_to(
            math::point(self.x_offset + x1 * self.scale, y1 * self.scale),
            math::point(self.x_offset + x * self.scale, y * self.scale),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_bezier_to(
            math::point(self.x_offset + x1 * self.scale, y1 * self.scale),
            math::point(self.x_offset + x2 * self.scale, y2 * self.scale),
            math::point(self.x_offset + x * self.scale, y * self.scale),
        );
    }

    fn close(&mut self) {
        self.builder.end(true);
    }
}

struct FaceVertexCtor {
    z: f32,
    normal_z: f32,
}

impl FillVertexConstructor<VertexPN> for FaceVertexCtor {
    fn new_vertex(&mut self, v: FillVertex) -> VertexPN {
        let p = v.position();
        VertexPN {
            position: [p.x, p.y, self.z],
            normal: [0.0, 0.0, self.normal_z],
        }
    }
}

/// Build an extruded mesh for `text` at the given em size and depth.
///
/// Characters without a glyph in the face are skipped; an entirely
/// unmapped string yields an empty mesh.
pub fn extrude_text(
    face: &Face,
    text: &str,
    size: f32,
    depth: f32,
) -> Result<MeshData, SceneError> {
    let scale = size / face.units_per_em() as f32;
    let mut path_builder = Path::builder();
    let mut x_cursor = 0.0f32;

    for ch in text.chars() {
        let Some(gid) = face.glyph_index(ch) else {
            tracing::warn!(character = %ch, "no glyph in font, skipping");
            continue;
        };
        let mut sink = OutlineSink {
            builder: &mut path_builder,
            scale,
            x_offset: x_cursor,
        };
        let _ = face.outline_glyph(gid, &mut sink);
        x_cursor += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
    }

    extrude_path(&path_builder.build(), depth)
}

/// Extrude a closed 2D path along +Z from 0 to `depth`.
pub(crate) fn extrude_path(path: &Path, depth: f32) -> Result<MeshData, SceneError> {
    // Front cap at z = depth.
    let mut buffers: VertexBuffers<VertexPN, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    tessellator
        .tessellate_path(
            path.as_slice(),
            &FillOptions::tolerance(FLATTEN_TOLERANCE),
            &mut BuffersBuilder::new(
                &mut buffers,
                FaceVertexCtor {
                    z: depth,
                    normal_z: 1.0,
                },
            ),
        )
        .map_err(|e| SceneError::Tessellation {
            reason: format!("{e:?}"),
        })?;

    let mut mesh = MeshData {
        vertices: buffers.vertices.clone(),
        indices: buffers.indices.clone(),
    };

    // Back cap at z = 0, winding reversed so it faces -Z.
    let back_offset = mesh.vertices.len() as u32;
    for v in &buffers.vertices {
        mesh.vertices.push(VertexPN {
            position: [v.position[0], v.position[1], 0.0],
            normal: [0.0, 0.0, -1.0],
        });
    }
    for tri in buffers.indices.chunks_exact(3) {
        mesh.indices.extend_from_slice(&[
            back_offset + tri[0],
            back_offset + tri[2],
            back_offset + tri[1],
        ]);
    }

    // Side walls: one quad per flattened outline segment.
    for event in path.iter() {
        match event {
            lyon_path::Event::Begin { .. } => {}
            lyon_path::Event::Line { from, to } => {
                add_side_wall(&mut mesh, from, to, depth);
            }
            lyon_path::Event::Quadratic { from, ctrl, to } => {
                let seg = lyon_geom::QuadraticBezierSegment { from, ctrl, to };
                seg.for_each_flattened(FLATTEN_TOLERANCE, &mut |ls: &lyon_geom::LineSegment<f32>| {
                    add_side_wall(&mut mesh, ls.from, ls.to, depth);
                });
            }
            lyon_path::Event::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                let seg = lyon_geom::CubicBezierSegment {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                };
                seg.for_each_flattened(FLATTEN_TOLERANCE, &mut |ls: &lyon_geom::LineSegment<f32>| {
                    add_side_wall(&mut mesh, ls.from, ls.to, depth);
                });
            }
            lyon_path::Event::End { last, first, close } => {
                if close {
                    add_side_wall(&mut mesh, last, first, depth);
                }
            }
        }
    }

    Ok(mesh)
}

fn add_side_wall(mesh: &mut MeshData, from: math::Point, to: math::Point, depth: f32) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-6 {
        return;
    }
    let normal = [dy / len, -dx / len, 0.0];

    let base = mesh.vertices.len() as u32;
    mesh.vertices.extend_from_slice(&[
        VertexPN {
            position: [from.x, from.y, 0.0],
            normal,
        },
        VertexPN {
            position: [to.x, to.y, 0.0],
            normal,
        },
        VertexPN {
            position: [to.x, to.y, depth],
            normal,
        },
        VertexPN {
            position: [from.x, from.y, depth],
            normal,
        },
    ]);
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}
