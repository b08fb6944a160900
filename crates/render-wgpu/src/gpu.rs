use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glyphstage_common::Viewport;
use glyphstage_render::{RenderBackend, RenderError};
use glyphstage_scene::{Material, PerspectiveCamera, Scene, SceneNode, VertexPN};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

const MAX_POINT_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightUniform {
    /// xyz = world position, w = range.
    position: [f32; 4],
    /// rgb premultiplied by intensity.
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    light_count: [u32; 4],
    lights: [LightUniform; MAX_POINT_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct NodeUniforms {
    model: [[f32; 4]; 4],
    base_color: [f32; 4],
    emissive: [f32; 4],
    /// rgb = specular tint, w = shininess exponent.
    specular: [f32; 4],
    /// x = metalness.
    params: [f32; 4],
}

/// Map a scene node's material onto the shader's uniform layout.
fn node_uniforms(node: &SceneNode) -> NodeUniforms {
    let model = node.transform.matrix().to_cols_array_2d();
    let base_color = node.material.base_color().to_array();
    let emissive = node.material.emission().to_array();
    let (specular, params) = match node.material {
        Material::Glossy {
            shininess, specular, ..
        } => (
            [specular.r, specular.g, specular.b, shininess],
            [0.0, 0.0, 0.0, 0.0],
        ),
        Material::Metallic {
            color,
            metalness,
            roughness,
        } => (
            // Metals tint their highlight with the base color.
            [color.r, color.g, color.b, ((1.0 - roughness) * 128.0).max(1.0)],
            [metalness, roughness, 0.0, 0.0],
        ),
        Material::Emissive { .. } => ([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0, 0.0]),
    };
    NodeUniforms {
        model,
        base_color,
        emissive,
        specular,
        params,
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    node_bind_group: wgpu::BindGroup,
}

/// wgpu implementation of [`RenderBackend`] drawing to a window surface.
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    depth_texture: wgpu::TextureView,
}

impl WgpuBackend {
    /// Create the GPU context for `window` and upload the scene geometry.
    pub fn new(
        window: Arc<Window>,
        viewport: Viewport,
        scene: &Scene,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Init {
                reason: format!("create surface: {e}"),
            })?;

        let adapter = pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        ))
        .ok_or_else(|| RenderError::Init {
            reason: "no compatible adapter".into(),
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glyphstage_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Init {
            reason: format!("request device: {e}"),
        })?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width,
            height: viewport.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let node_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("node_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &node_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<VertexPN>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let meshes = Self::upload_scene(&device, &node_layout, scene);
        let depth_texture = Self::create_depth_texture(&device, viewport);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            meshes = meshes.len(),
            "wgpu backend initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            frame_buffer,
            frame_bind_group,
            meshes,
            depth_texture,
        })
    }

    fn upload_scene(
        device: &wgpu::Device,
        node_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> Vec<GpuMesh> {
        let mut meshes = Vec::with_capacity(scene.nodes.len());
        for node in &scene.nodes {
            if node.mesh.is_empty() {
                tracing::warn!(node = %node.name, "skipping node with empty mesh");
                continue;
            }
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_vertices", node.name)),
                contents: bytemuck::cast_slice(&node.mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_indices", node.name)),
                contents: bytemuck::cast_slice(&node.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_uniforms", node.name)),
                contents: bytemuck::bytes_of(&node_uniforms(node)),
                usage: wgpu::BufferUsages::UNIFORM,
            });
            let node_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{}_bind_group", node.name)),
                layout: node_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            meshes.push(GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: node.mesh.indices.len() as u32,
                node_bind_group,
            });
        }
        meshes
    }

    fn frame_uniforms(scene: &Scene, camera: &PerspectiveCamera) -> FrameUniforms {
        let mut lights = [LightUniform::zeroed(); MAX_POINT_LIGHTS];
        let scene_lights = scene.point_lights();
        if scene_lights.len() > MAX_POINT_LIGHTS {
            tracing::warn!(
                count = scene_lights.len(),
                max = MAX_POINT_LIGHTS,
                "too many point lights, extra lights dropped"
            );
        }
        let count = scene_lights.len().min(MAX_POINT_LIGHTS);
        for (slot, light) in lights.iter_mut().zip(scene_lights.iter()) {
            *slot = LightUniform {
                position: [
                    light.position.x,
                    light.position.y,
                    light.position.z,
                    light.range,
                ],
                color: [
                    light.color.r * light.intensity,
                    light.color.g * light.intensity,
                    light.color.b * light.intensity,
                    1.0,
                ],
            };
        }

        FrameUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: [camera.eye.x, camera.eye.y, camera.eye.z, 1.0],
            ambient: [
                scene.ambient.color.r * scene.ambient.intensity,
                scene.ambient.color.g * scene.ambient.intensity,
                scene.ambient.color.b * scene.ambient.intensity,
                1.0,
            ],
            light_count: [count as u32, 0, 0, 0],
            lights,
        }
    }

    fn create_depth_texture(device: &wgpu::Device, viewport: Viewport) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: viewport.width,
                height: viewport.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl RenderBackend for WgpuBackend {
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(RenderError::SurfaceUnavailable {
                    reason: "surface lost, reconfigured".into(),
                });
            }
            Err(e) => {
                return Err(RenderError::SurfaceUnavailable {
                    reason: e.to_string(),
                });
            }
        };

        self.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&Self::frame_uniforms(scene, camera)),
        );

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let bg = scene.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mesh_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for mesh in &self.meshes {
                pass.set_bind_group(1, &mesh.node_bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Self::create_depth_texture(&self.device, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use glyphstage_common::{Color, Transform};
    use glyphstage_scene::mesh;

    fn node_with(material: Material) -> SceneNode {
        SceneNode {
            name: "test".into(),
            transform: Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
            mesh: mesh::cube(1.0),
            material,
            light: None,
        }
    }

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<NodeUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
    }

    #[test]
    fn glossy_material_keeps_its_specular_tint() {
        let u = node_uniforms(&node_with(Material::Glossy {
            color: Color::rgb(0.2, 0.8, 0.2),
            shininess: 50.0,
            specular: Color::WHITE,
        }));
        assert_eq!(u.specular, [1.0, 1.0, 1.0, 50.0]);
        assert_eq!(u.params[0], 0.0);
        assert_eq!(u.emissive[0], 0.0);
    }

    #[test]
    fn metallic_material_tints_highlight_with_base_color() {
        let u = node_uniforms(&node_with(Material::Metallic {
            color: Color::rgb(0.8, 0.1, 0.7),
            metalness: 0.95,
            roughness: 0.1,
        }));
        assert_eq!(&u.specular[..3], &[0.8, 0.1, 0.7]);
        assert_eq!(u.params[0], 0.95);
        // Low roughness maps to a tight highlight.
        assert!(u.specular[3] > 100.0);
    }

    #[test]
    fn emissive_material_emits_scaled_color() {
        let u = node_uniforms(&node_with(Material::Emissive {
            color: Color::WHITE,
            intensity: 1.0,
        }));
        assert_eq!(&u.emissive[..3], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn frame_uniforms_clamp_light_count() {
        let scene = Scene {
            background: Color::BLACK,
            ambient: Default::default(),
            lights: (0..12)
                .map(|i| {
                    glyphstage_scene::PointLight::new(
                        Color::WHITE,
                        1.0,
                        10.0,
                        Vec3::new(i as f32, 0.0, 0.0),
                    )
                })
                .collect(),
            nodes: Vec::new(),
        };
        let camera = PerspectiveCamera::default();
        let u = WgpuBackend::frame_uniforms(&scene, &camera);
        assert_eq!(u.light_count[0], MAX_POINT_LIGHTS as u32);
    }
}
