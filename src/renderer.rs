use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::core::error::RenderError;
use crate::core::gpu_context::GpuContext;
use crate::core::viewport::Viewport;
use crate::math::Color;
use crate::scene::{BuiltScene, LightKind, NodeId, NodeKind};
use crate::traits::{FrameOutcome, Rasterizer};
use crate::types::{GlobalsUniform, LightUniform, LineVertex, ObjectUniform, Vertex, MAX_LIGHTS};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_OBJECT_CAPACITY: usize = 64;

/// What a single draw call renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Mesh,
    Lines,
}

#[derive(Debug, Clone, Copy)]
pub struct Draw {
    pub node: NodeId,
    pub kind: DrawKind,
    pub object: ObjectUniform,
}

/// CPU-side snapshot of one frame: frame-wide uniforms plus per-node draws
#[derive(Debug, Clone)]
pub struct FrameData {
    pub globals: GlobalsUniform,
    pub draws: Vec<Draw>,
    /// Lights beyond `MAX_LIGHTS`, which are skipped
    pub dropped_lights: usize,
}

impl FrameData {
    pub fn collect(scene: &BuiltScene) -> Result<Self, RenderError> {
        let view = scene.camera_view().ok_or(RenderError::MissingCamera)?;
        let graph = scene.graph();

        let mut globals = GlobalsUniform {
            view_proj: view.view_projection().to_cols_array_2d(),
            camera_position: view.position.extend(1.0).to_array(),
            ..Default::default()
        };
        let mut ambient = Vec3::ZERO;
        let mut light_count = 0;
        let mut dropped_lights = 0;
        let mut draws = Vec::new();

        for (id, node, world) in graph.traverse() {
            match &node.kind {
                NodeKind::Mesh(mesh) => {
                    let color = mesh.material.color.to_linear();
                    draws.push(Draw {
                        node: id,
                        kind: DrawKind::Mesh,
                        object: object_uniform(world, color, mesh.material.is_lit()),
                    });
                }
                NodeKind::Helper(_) => draws.push(Draw {
                    node: id,
                    kind: DrawKind::Lines,
                    object: object_uniform(world, Color::WHITE, false),
                }),
                NodeKind::Light(light) => {
                    let radiance = Vec3::from_array(light.color.to_linear().to_array());
                    let position = world.transform_point3(Vec3::ZERO);
                    let direction = match light.kind {
                        LightKind::Ambient => {
                            ambient += radiance * light.intensity;
                            continue;
                        }
                        LightKind::Point => position.extend(1.0),
                        LightKind::Directional { target } => {
                            (position - target).normalize_or_zero().extend(0.0)
                        }
                    };
                    if light_count == MAX_LIGHTS {
                        dropped_lights += 1;
                        continue;
                    }
                    globals.lights[light_count] = LightUniform {
                        position: direction.to_array(),
                        color: radiance.extend(light.intensity).to_array(),
                    };
                    light_count += 1;
                }
                NodeKind::Group | NodeKind::Camera(_) => {}
            }
        }

        globals.ambient = ambient.extend(1.0).to_array();
        globals.light_count = [light_count as u32, 0, 0, 0];

        Ok(Self {
            globals,
            draws,
            dropped_lights,
        })
    }
}

fn object_uniform(world: Mat4, color: Color, lit: bool) -> ObjectUniform {
    ObjectUniform {
        model: world.to_cols_array_2d(),
        normal_matrix: world.inverse().transpose().to_cols_array_2d(),
        color: [color.r, color.g, color.b, 1.0],
        params: [if lit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuLines {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

/// Offscreen colour and depth at the viewport's drawable size
struct RenderTarget {
    size: (u32, u32),
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    blit_bind_group: wgpu::BindGroup,
}

/// wgpu rasterizer for a [`BuiltScene`].
///
/// The scene is drawn into an offscreen target sized by the viewport's
/// drawable size (logical size times the capped pixel ratio), then stretched
/// onto the window surface with a fullscreen triangle.
pub struct SceneRenderer {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_capacity: usize,
    object_stride: u64,
    blit_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    target: RenderTarget,
    meshes: HashMap<NodeId, GpuMesh>,
    lines: HashMap<NodeId, GpuLines>,
    warned_lights: bool,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, viewport: &Viewport) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;
        let surface_config = Self::create_surface_config(&surface, gpu.adapter(), &window)?;
        surface.configure(gpu.device(), &surface_config);

        let device = gpu.device();

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<GlobalsUniform>() as u64),
                },
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
                },
                count: None,
            }],
        });
        let object_stride = align_to(
            std::mem::size_of::<ObjectUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (object_buffer, object_bind_group) =
            Self::create_object_buffer(device, &object_layout, object_stride, INITIAL_OBJECT_CAPACITY);

        let (mesh_pipeline, line_pipeline) =
            Self::create_scene_pipelines(device, &globals_layout, &object_layout);

        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Display Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let blit_pipeline = Self::create_blit_pipeline(device, &blit_layout, surface_config.format);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Display Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let target = Self::create_target(device, &blit_layout, &sampler, viewport.drawable_size());

        log::info!(
            "renderer ready: surface {}x{} {:?}, target {}x{}",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            target.size.0,
            target.size.1
        );

        Ok(Self {
            window,
            gpu,
            surface,
            surface_config,
            mesh_pipeline,
            line_pipeline,
            blit_pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_capacity: INITIAL_OBJECT_CAPACITY,
            object_stride,
            blit_layout,
            sampler,
            target,
            meshes: HashMap::new(),
            lines: HashMap::new(),
            warned_lights: false,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        window: &Window,
    ) -> Result<wgpu::SurfaceConfiguration, RenderError> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(RenderError::UnsupportedSurface)?;
        let size = window.inner_size();

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_scene_pipelines(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
    ) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[globals_layout, object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label: &str,
                        vs: &str,
                        fs: &str,
                        buffer: wgpu::VertexBufferLayout<'static>,
                        topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers: &[buffer],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: COLOR_FORMAT,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let mesh = pipeline(
            "Mesh Pipeline",
            "vs_mesh",
            "fs_mesh",
            Vertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
        );
        let lines = pipeline(
            "Line Pipeline",
            "vs_line",
            "fs_line",
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
        );
        (mesh, lines)
    }

    fn create_blit_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Display Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("display.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Display Pipeline Layout"),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Display Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_target(
        device: &wgpu::Device,
        blit_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        (width, height): (u32, u32),
    ) -> RenderTarget {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = |label: &str, format: wgpu::TextureFormat, usage: wgpu::TextureUsages| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let color_view = texture(
            "Scene Color Target",
            COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let depth_view = texture(
            "Scene Depth Target",
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        let blit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Display Bind Group"),
            layout: blit_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        RenderTarget {
            size: (width, height),
            color_view,
            depth_view,
            blit_bind_group,
        }
    }

    fn reconfigure_surface(&mut self) {
        let size = self.window.inner_size();
        self.surface_config.width = size.width.max(1);
        self.surface_config.height = size.height.max(1);
        self.surface.configure(self.gpu.device(), &self.surface_config);
    }

    /// Uploads vertex data for nodes seen for the first time
    fn upload_geometry(&mut self, scene: &BuiltScene, draws: &[Draw]) {
        let device = self.gpu.device();
        for draw in draws {
            let Some(node) = scene.graph().get(draw.node) else {
                continue;
            };
            match (&node.kind, draw.kind) {
                (NodeKind::Mesh(mesh), DrawKind::Mesh) if !self.meshes.contains_key(&draw.node) => {
                    let data = mesh.geometry.tessellate();
                    let label = node.label();
                    self.meshes.insert(
                        draw.node,
                        GpuMesh {
                            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some(label),
                                contents: bytemuck::cast_slice(&data.vertices),
                                usage: wgpu::BufferUsages::VERTEX,
                            }),
                            index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some(label),
                                contents: bytemuck::cast_slice(&data.indices),
                                usage: wgpu::BufferUsages::INDEX,
                            }),
                            index_count: data.indices.len() as u32,
                        },
                    );
                }
                (NodeKind::Helper(helper), DrawKind::Lines) if !self.lines.contains_key(&draw.node) => {
                    let vertices = helper.line_vertices();
                    self.lines.insert(
                        draw.node,
                        GpuLines {
                            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some(node.label()),
                                contents: bytemuck::cast_slice(&vertices),
                                usage: wgpu::BufferUsages::VERTEX,
                            }),
                            vertex_count: vertices.len() as u32,
                        },
                    );
                }
                _ => {}
            }
        }
    }

    fn write_objects(&mut self, draws: &[Draw]) {
        if draws.len() > self.object_capacity {
            self.object_capacity = draws.len().next_power_of_two();
            log::debug!("growing object buffer to {} entries", self.object_capacity);
            let (buffer, bind_group) = Self::create_object_buffer(
                self.gpu.device(),
                &self.object_layout,
                self.object_stride,
                self.object_capacity,
            );
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
        }

        let stride = self.object_stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        for (chunk, draw) in bytes.chunks_exact_mut(stride).zip(draws) {
            let object = bytemuck::bytes_of(&draw.object);
            chunk[..object.len()].copy_from_slice(object);
        }
        self.gpu.queue().write_buffer(&self.object_buffer, 0, &bytes);
    }

    /// Next surface texture, or `None` when this frame should be skipped
    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated) => {
                log::debug!("surface outdated, reconfiguring");
                self.reconfigure_surface();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring surface texture, skipping frame");
                Ok(None)
            }
            Err(wgpu::SurfaceError::Lost) => Err(RenderError::ContextLost("surface lost".into())),
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RenderError::OutOfMemory),
            Err(other) => Err(RenderError::ContextLost(other.to_string())),
        }
    }
}

impl Rasterizer for SceneRenderer {
    fn resize(&mut self, viewport: &Viewport) {
        self.reconfigure_surface();
        let size = viewport.drawable_size();
        if size != self.target.size {
            self.target =
                Self::create_target(self.gpu.device(), &self.blit_layout, &self.sampler, size);
        }
    }

    fn render(
        &mut self,
        scene: &BuiltScene,
        _viewport: &Viewport,
    ) -> Result<FrameOutcome, RenderError> {
        if self.gpu.is_lost() {
            return Err(RenderError::ContextLost("GPU device lost".into()));
        }

        let frame_data = FrameData::collect(scene)?;
        if frame_data.dropped_lights > 0 && !self.warned_lights {
            log::warn!(
                "scene has {} more lights than the {MAX_LIGHTS} supported; extras are ignored",
                frame_data.dropped_lights
            );
            self.warned_lights = true;
        }

        let Some(frame) = self.acquire_frame()? else {
            return Ok(FrameOutcome::Skipped);
        };

        self.upload_geometry(scene, &frame_data.draws);
        self.write_objects(&frame_data.draws);
        self.gpu
            .queue()
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&frame_data.globals));

        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let background = scene.background().to_linear();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.r as f64,
                            g: background.g as f64,
                            b: background.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (index, draw) in frame_data.draws.iter().enumerate() {
                let offset = (index as u64 * self.object_stride) as u32;
                match draw.kind {
                    DrawKind::Mesh => {
                        let Some(mesh) = self.meshes.get(&draw.node) else {
                            continue;
                        };
                        pass.set_pipeline(&self.mesh_pipeline);
                        pass.set_bind_group(1, &self.object_bind_group, &[offset]);
                        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                    }
                    DrawKind::Lines => {
                        let Some(lines) = self.lines.get(&draw.node) else {
                            continue;
                        };
                        pass.set_pipeline(&self.line_pipeline);
                        pass.set_bind_group(1, &self.object_bind_group, &[offset]);
                        pass.set_vertex_buffer(0, lines.vertex_buffer.slice(..));
                        pass.draw(0..lines.vertex_count, 0..1);
                    }
                }
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Display Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &self.target.blit_bind_group, &[]);
            pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();
        Ok(FrameOutcome::Presented)
    }
}

fn align_to(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}
