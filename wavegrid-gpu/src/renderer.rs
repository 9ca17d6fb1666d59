//! Instanced sphere renderer with ambient and spot lighting

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3, Vector3};
use wavegrid_core::{Error, Result};
use winit::window::Window;

use crate::device::GpuContext;
use crate::sphere::{SphereMesh, SphereVertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

/// Per-instance data: world translation of one grid sphere
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub translation: [f32; 3],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

    /// Instance buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Matrix4<f32>, eye: Vector3<f32>) -> Self {
        Self {
            view_proj: view_proj.into(),
            view_pos: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

/// A spot light aimed at a fixed target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Range; 0 disables distance falloff
    pub distance: f32,
    /// Cone half-angle in radians
    pub angle: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 10.0, 60.0),
            target: Point3::origin(),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            distance: 1000.0,
            angle: std::f32::consts::FRAC_PI_3,
        }
    }
}

/// Lighting uniform data, packed into vec4 slots
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
    pub spot_position: [f32; 4],
    pub spot_color: [f32; 4],
    pub spot_direction: [f32; 4],
}

impl LightingUniform {
    pub fn new(ambient_color: [f32; 3], ambient_intensity: f32, spot: &SpotLight) -> Self {
        let direction = spot.target - spot.position;
        let direction = if direction.norm_squared() > f32::EPSILON {
            direction.normalize()
        } else {
            -Vector3::y()
        };
        Self {
            ambient: [
                ambient_color[0] * ambient_intensity,
                ambient_color[1] * ambient_intensity,
                ambient_color[2] * ambient_intensity,
                1.0,
            ],
            spot_position: [spot.position.x, spot.position.y, spot.position.z, spot.distance.max(0.0)],
            spot_color: [spot.color[0], spot.color[1], spot.color[2], spot.intensity],
            spot_direction: [direction.x, direction.y, direction.z, spot.angle.cos()],
        }
    }
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0], 1.0, &SpotLight::default())
    }
}

/// Material uniform data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    /// x = roughness, y = metalness
    pub params: [f32; 4],
}

impl MaterialUniform {
    pub fn new(color: [f32; 3], roughness: f32, metalness: f32) -> Self {
        Self {
            color: [color[0], color[1], color[2], 1.0],
            params: [roughness, metalness, 0.0, 0.0],
        }
    }
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self::new([0.8, 0.8, 0.8], 1.0, 0.0)
    }
}

/// Sphere rendering configuration
#[derive(Debug, Clone)]
pub struct SphereRenderConfig {
    pub lighting: LightingUniform,
    pub material: MaterialUniform,
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
    pub enable_backface_culling: bool,
    pub enable_multisampling: bool,
}

impl SphereRenderConfig {
    fn sample_count(&self) -> u32 {
        if self.enable_multisampling {
            MSAA_SAMPLES
        } else {
            1
        }
    }
}

impl Default for SphereRenderConfig {
    fn default() -> Self {
        Self {
            lighting: LightingUniform::default(),
            material: MaterialUniform::default(),
            background_color: [0.1, 0.1, 0.1, 1.0],
            enable_depth_test: true,
            enable_backface_culling: true,
            enable_multisampling: true,
        }
    }
}

/// Draws one sphere mesh once per grid instance
pub struct SphereRenderer {
    pub gpu_context: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
    depth_view: Option<wgpu::TextureView>,
    msaa_view: Option<wgpu::TextureView>,
    config: SphereRenderConfig,
}

impl SphereRenderer {
    /// Create a renderer drawing `mesh` into `window`
    pub async fn new(window: Arc<Window>, mesh: &SphereMesh, config: SphereRenderConfig) -> Result<Self> {
        let size = window.inner_size();
        let (gpu_context, surface) = GpuContext::with_surface(window).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface reports no supported formats".to_string()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);

        let camera_uniform = CameraUniform::new(Matrix4::identity(), Vector3::zeros());
        let camera_buffer = gpu_context.create_buffer_init(
            "Camera Buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let lighting_buffer = gpu_context.create_buffer_init(
            "Lighting Buffer",
            &[config.lighting],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let material_buffer = gpu_context.create_buffer_init(
            "Material Buffer",
            &[config.material],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = gpu_context.create_bind_group_layout(
            "sphere_bind_group_layout",
            &[uniform_entry(0), uniform_entry(1), uniform_entry(2)],
        );
        let bind_group = gpu_context.create_bind_group(
            "sphere_bind_group",
            &bind_group_layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: material_buffer.as_entire_binding(),
                },
            ],
        );

        let shader = gpu_context.create_shader_module("Sphere Shader", include_str!("shaders/sphere.wgsl"));
        let pipeline = Self::create_render_pipeline(
            &gpu_context.device,
            &bind_group_layout,
            &shader,
            surface_format,
            &config,
        );

        let vertex_buffer = gpu_context.create_buffer_init("Sphere Vertex Buffer", &mesh.vertices, wgpu::BufferUsages::VERTEX);
        let index_buffer = gpu_context.create_buffer_init("Sphere Index Buffer", &mesh.indices, wgpu::BufferUsages::INDEX);

        let instance_capacity = 1;
        let instance_buffer = Self::create_instance_buffer(&gpu_context, instance_capacity);

        let mut renderer = Self {
            gpu_context,
            surface,
            surface_config,
            pipeline,
            camera_uniform,
            camera_buffer,
            lighting_buffer,
            material_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instance_buffer,
            instance_capacity,
            instance_count: 0,
            depth_view: None,
            msaa_view: None,
            config,
        };
        renderer.recreate_attachments();

        tracing::info!(
            "Sphere renderer ready: {}x{} {:?}, {} triangles per sphere, msaa={}",
            renderer.surface_config.width,
            renderer.surface_config.height,
            surface_format,
            mesh.triangle_count(),
            renderer.config.enable_multisampling
        );

        Ok(renderer)
    }

    /// Create the render pipeline for instanced spheres
    fn create_render_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        config: &SphereRenderConfig,
    ) -> wgpu::RenderPipeline {
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Render Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[SphereVertex::desc(), InstanceRaw::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: if config.enable_backface_culling {
                    Some(wgpu::Face::Back)
                } else {
                    None
                },
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: if config.enable_depth_test {
                Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                })
            } else {
                None
            },
            multisample: wgpu::MultisampleState {
                count: config.sample_count(),
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    fn create_instance_buffer(gpu_context: &GpuContext, capacity: usize) -> wgpu::Buffer {
        gpu_context.create_buffer(
            "Sphere Instance Buffer",
            (capacity.max(1) * std::mem::size_of::<InstanceRaw>()) as u64,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        )
    }

    fn create_attachment(&self, label: &str, format: wgpu::TextureFormat) -> wgpu::TextureView {
        let texture = self.gpu_context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: self.surface_config.width,
                height: self.surface_config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: self.config.sample_count(),
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Rebuild depth and MSAA targets for the current surface size
    fn recreate_attachments(&mut self) {
        self.depth_view = self
            .config
            .enable_depth_test
            .then(|| self.create_attachment("Depth Texture", DEPTH_FORMAT));
        self.msaa_view = self
            .config
            .enable_multisampling
            .then(|| self.create_attachment("MSAA Texture", self.surface_config.format));
    }

    /// Update camera matrices and position
    pub fn update_camera(&mut self, view_proj: Matrix4<f32>, camera_pos: Vector3<f32>) {
        self.camera_uniform = CameraUniform::new(view_proj, camera_pos);
        self.gpu_context
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&self.camera_uniform));
    }

    /// Upload instance translations, growing the buffer when needed
    pub fn update_instances(&mut self, instances: &[InstanceRaw]) {
        if instances.len() > self.instance_capacity {
            let capacity = instances.len().next_power_of_two();
            tracing::debug!("Growing instance buffer {} -> {}", self.instance_capacity, capacity);
            self.instance_buffer = Self::create_instance_buffer(&self.gpu_context, capacity);
            self.instance_capacity = capacity;
        }
        if !instances.is_empty() {
            self.gpu_context
                .queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.surface_config.width, self.surface_config.height)
    }

    /// Resize renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.gpu_context.device, &self.surface_config);
            self.recreate_attachments();
        }
    }

    /// Draw all instances and present the frame.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("Surface lost or outdated, reconfiguring");
                self.resize(self.size());
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {:?}", e))),
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu_context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sphere Render Encoder"),
            });

        // Determine render target
        let (color_attachment, resolve_target) = match self.msaa_view {
            Some(ref msaa_view) => (msaa_view, Some(&view)),
            None => (&view, None),
        };

        {
            let [r, g, b, a] = self.config.background_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sphere Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_attachment,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth_view.as_ref().map(|depth_view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.instance_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
            }
        }

        self.gpu_context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_layouts_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 64);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 12);
    }

    #[test]
    fn test_spot_light_points_at_target() {
        let lighting = LightingUniform::default();
        let [x, y, z, cos_angle] = lighting.spot_direction;
        let expected = Vector3::new(0.0, -10.0, -60.0).normalize();
        assert_relative_eq!(x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(y, expected.y, epsilon = 1e-6);
        assert_relative_eq!(z, expected.z, epsilon = 1e-6);
        assert_relative_eq!(cos_angle, 0.5, epsilon = 1e-6);
        assert_relative_eq!(lighting.spot_position[3], 1000.0);
    }

    #[test]
    fn test_ambient_scaled_by_intensity() {
        let lighting = LightingUniform::new([0.5, 1.0, 0.2], 2.0, &SpotLight::default());
        assert_eq!(lighting.ambient, [1.0, 2.0, 0.4, 1.0]);
    }

    #[test]
    fn test_degenerate_spot_direction_falls_back_to_down() {
        let spot = SpotLight {
            target: SpotLight::default().position,
            ..SpotLight::default()
        };
        let lighting = LightingUniform::new([1.0; 3], 1.0, &spot);
        assert_eq!(&lighting.spot_direction[..3], &[0.0, -1.0, 0.0]);
    }

    #[test]
    fn test_material_params() {
        let material = MaterialUniform::new([0.1, 0.2, 0.3], 0.7, 0.25);
        assert_eq!(material.color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(material.params[..2], [0.7, 0.25]);
    }
}
