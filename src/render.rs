use glam::Mat4;
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
mod pipelines;
mod targets;
use pipelines::{Layouts, Pipelines};
use targets::DepthTarget;

use crate::camera::Camera;
use crate::geometry::MeshData;
use crate::resources::{
    MaterialDesc, MaterialKind, ResourceId, ResourceKind, SceneBackend, TextureData,
};
use crate::scene::SceneGraph;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    // instance positions and capacity
    instances: Option<(wgpu::Buffer, usize)>,
}

struct GpuMaterial {
    kind: MaterialKind,
    color: [f32; 4],
    params: [f32; 3],
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture_bind_group: Option<wgpu::BindGroup>,
}

struct GpuTexture {
    tex: wgpu::Texture,
    view: wgpu::TextureView,
}

/// WebGPU renderer for one globe canvas; also the [`SceneBackend`] that owns its GPU resources.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    view_format: wgpu::TextureFormat,
    depth: DepthTarget,
    layouts: Layouts,
    pipelines: Pipelines,
    linear_sampler: wgpu::Sampler,

    geometries: Vec<Option<GpuGeometry>>,
    materials: Vec<Option<GpuMaterial>>,
    textures: Vec<Option<GpuTexture>>,

    width: u32,
    height: u32,
}

impl GpuRenderer {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| anyhow::anyhow!(format!("create_surface error: {:?}", e)))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("globe_device"),
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // Always render through an sRGB view; raw-output shaders compensate
        let view_format = format.add_srgb_suffix();
        // Transparent canvas: the page background shows through
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: if view_format == format {
                vec![]
            } else {
                vec![view_format]
            },
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth = DepthTarget::new(&device, config.width, config.height);
        let layouts = Layouts::new(&device);
        let pipelines = Pipelines::new(&device, &layouts, view_format);
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        log::info!(
            "[gpu] surface {}x{} format={:?} view={:?} alpha={:?}",
            config.width,
            config.height,
            format,
            view_format,
            alpha_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            view_format,
            width: config.width,
            height: config.height,
            config,
            depth,
            layouts,
            pipelines,
            linear_sampler,
            geometries: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth.recreate(&self.device, width, height);
        }
    }

    /// Reconfigure after the surface reported `Lost` or `Outdated`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn material(&self, id: ResourceId) -> Option<&GpuMaterial> {
        (id.kind == ResourceKind::Material)
            .then(|| self.materials.get(id.index as usize))
            .flatten()
            .and_then(Option::as_ref)
    }

    fn geometry(&self, id: ResourceId) -> Option<&GpuGeometry> {
        (id.kind == ResourceKind::Geometry)
            .then(|| self.geometries.get(id.index as usize))
            .flatten()
            .and_then(Option::as_ref)
    }

    pub fn render(
        &mut self,
        scene: &SceneGraph,
        camera: &Camera,
        time: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let items = scene.draw_items();
        let view_m = camera.view_matrix();
        let proj_m = camera.projection_matrix();

        for item in &items {
            if let Some(mat) = self.material(item.material) {
                let u = draw_uniforms(view_m, proj_m, item.model, mat, time);
                self.queue
                    .write_buffer(&mat.uniform_buffer, 0, bytemuck::bytes_of(&u));
            }
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for item in &items {
                let (Some(mat), Some(geo)) = (self.material(item.material), self.geometry(item.geometry))
                else {
                    continue;
                };
                let Some(pipeline) = self.pipelines.get(mat.kind) else {
                    continue;
                };
                if mat.kind.textured() && mat.texture_bind_group.is_none() {
                    continue;
                }
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, &mat.bind_group, &[]);
                if let Some(tbg) = &mat.texture_bind_group {
                    rpass.set_bind_group(1, tbg, &[]);
                }
                rpass.set_vertex_buffer(0, geo.vertex_buffer.slice(..));
                let instances = match &geo.instances {
                    Some((buffer, capacity)) => {
                        rpass.set_vertex_buffer(1, buffer.slice(..));
                        item.instances.min(*capacity as u32)
                    }
                    None => 1,
                };
                rpass.set_index_buffer(geo.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..geo.index_count, 0, 0..instances);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Destroy whatever is still allocated, then the device itself.
    pub fn destroy(&mut self) {
        let leftover = self.geometries.iter().flatten().count()
            + self.materials.iter().flatten().count()
            + self.textures.iter().flatten().count();
        if leftover > 0 {
            log::warn!("[gpu] destroying {} resources still live", leftover);
        }
        for index in 0..self.geometries.len() {
            self.release(ResourceId {
                kind: ResourceKind::Geometry,
                index: index as u32,
            });
        }
        for index in 0..self.materials.len() {
            self.release(ResourceId {
                kind: ResourceKind::Material,
                index: index as u32,
            });
        }
        for index in 0..self.textures.len() {
            self.release(ResourceId {
                kind: ResourceKind::Texture,
                index: index as u32,
            });
        }
        self.depth.destroy();
        self.device.destroy();
        log::info!("[gpu] device destroyed");
    }
}

fn draw_uniforms(
    view: Mat4,
    proj: Mat4,
    model: Mat4,
    mat: &GpuMaterial,
    time: f32,
) -> DrawUniforms {
    DrawUniforms {
        view: view.to_cols_array_2d(),
        proj: proj.to_cols_array_2d(),
        model: model.to_cols_array_2d(),
        color: mat.color,
        params: [time, mat.params[0], mat.params[1], mat.params[2]],
    }
}

impl SceneBackend for GpuRenderer {
    fn create_geometry(&mut self, label: &str, mesh: &MeshData) -> ResourceId {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.geometries.push(Some(GpuGeometry {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instances: None,
        }));
        ResourceId {
            kind: ResourceKind::Geometry,
            index: (self.geometries.len() - 1) as u32,
        }
    }

    fn create_instanced_geometry(
        &mut self,
        label: &str,
        mesh: &MeshData,
        capacity: usize,
    ) -> ResourceId {
        let id = self.create_geometry(label, mesh);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instances"),
            size: (capacity.max(1) * std::mem::size_of::<[f32; 3]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if let Some(Some(geo)) = self.geometries.get_mut(id.index as usize) {
            geo.instances = Some((buffer, capacity));
        }
        id
    }

    fn create_material(&mut self, label: &str, desc: &MaterialDesc) -> ResourceId {
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<DrawUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layouts.uniforms,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture_view = desc
            .texture
            .filter(|id| id.kind == ResourceKind::Texture)
            .and_then(|id| self.textures.get(id.index as usize))
            .and_then(Option::as_ref)
            .map(|t| &t.view);
        if desc.kind.textured() && texture_view.is_none() {
            log::warn!("[gpu] material {} has no texture", label);
        }
        let texture_bind_group = texture_view.map(|view| {
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.layouts.texture,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.linear_sampler),
                    },
                ],
            })
        });
        self.materials.push(Some(GpuMaterial {
            kind: desc.kind,
            color: [desc.color[0], desc.color[1], desc.color[2], desc.opacity],
            params: desc.params,
            uniform_buffer,
            bind_group,
            texture_bind_group,
        }));
        ResourceId {
            kind: ResourceKind::Material,
            index: (self.materials.len() - 1) as u32,
        }
    }

    fn create_texture(&mut self, label: &str, data: &TextureData) -> ResourceId {
        let (tex, view) = helpers::create_rgba_texture(
            &self.device,
            &self.queue,
            label,
            data.width,
            data.height,
            &data.pixels,
        );
        self.textures.push(Some(GpuTexture { tex, view }));
        ResourceId {
            kind: ResourceKind::Texture,
            index: (self.textures.len() - 1) as u32,
        }
    }

    fn write_instances(&mut self, geometry: ResourceId, positions: &[[f32; 3]]) {
        let Some((buffer, capacity)) = self
            .geometry(geometry)
            .and_then(|g| g.instances.as_ref())
        else {
            return;
        };
        let n = positions.len().min(*capacity);
        self.queue
            .write_buffer(buffer, 0, bytemuck::cast_slice(&positions[..n]));
    }

    fn release(&mut self, id: ResourceId) {
        let index = id.index as usize;
        match id.kind {
            ResourceKind::Geometry => {
                if let Some(geo) = self.geometries.get_mut(index).and_then(Option::take) {
                    geo.vertex_buffer.destroy();
                    geo.index_buffer.destroy();
                    if let Some((buffer, _)) = geo.instances {
                        buffer.destroy();
                    }
                }
            }
            ResourceKind::Material => {
                if let Some(mat) = self.materials.get_mut(index).and_then(Option::take) {
                    mat.uniform_buffer.destroy();
                }
            }
            ResourceKind::Texture => {
                if let Some(tex) = self.textures.get_mut(index).and_then(Option::take) {
                    tex.tex.destroy();
                }
            }
        }
    }
}
