/// WGSL shader for lit scene meshes: ambient + point lights with a
/// Blinn-Phong specular term and an emissive term. Normals come in
/// per-face, so shading is flat.
pub const MESH_SHADER: &str = r#"
struct FrameUniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    ambient: vec4<f32>,
    light_count: vec4<u32>,
    lights: array<Light, 8>,
};

struct Light {
    // xyz = world position, w = range
    position: vec4<f32>,
    // rgb premultiplied by intensity
    color: vec4<f32>,
};

struct NodeUniforms {
    model: mat4x4<f32>,
    base_color: vec4<f32>,
    emissive: vec4<f32>,
    // rgb = specular tint, w = shininess exponent
    specular: vec4<f32>,
    // x = metalness
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

@group(1) @binding(0)
var<uniform> node: NodeUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = node.model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (node.model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = world_normal;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(frame.eye.xyz - in.world_pos);

    // Metals darken their diffuse term and tint the highlight instead.
    let metalness = node.params.x;
    let diffuse_color = node.base_color.rgb * (1.0 - metalness);

    var color = node.base_color.rgb * frame.ambient.rgb;

    for (var i = 0u; i < frame.light_count.x; i = i + 1u) {
        let light = frame.lights[i];
        let to_light = light.position.xyz - in.world_pos;
        let dist = length(to_light);
        let range = light.position.w;
        if (dist >= range) {
            continue;
        }
        let l = to_light / max(dist, 1e-4);
        let attenuation = 1.0 - dist / range;

        let diffuse = max(dot(n, l), 0.0);
        let h = normalize(l + v);
        let spec = pow(max(dot(n, h), 0.0), max(node.specular.w, 1.0));

        color = color
            + light.color.rgb * attenuation
                * (diffuse_color * diffuse + node.specular.rgb * spec);
    }

    color = color + node.emissive.rgb;
    return vec4<f32>(color, node.base_color.a);
}
"#;
