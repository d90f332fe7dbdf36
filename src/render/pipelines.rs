use wgpu;

use super::helpers::{self, DEPTH_FORMAT};
use crate::resources::{Blend, MaterialKind};
use crate::shaders;

struct PipelineSpec {
    source: &'static str,
    fs: &'static str,
    cull: Option<wgpu::Face>,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

// Filaments and nucleus sit inside the opaque core and are drawn through it.
fn spec(kind: MaterialKind) -> PipelineSpec {
    use wgpu::CompareFunction::{Always, Less};
    let (source, fs, cull, depth_write, depth_compare) = match kind {
        MaterialKind::Core => (shaders::CORE_WGSL, "fs_core", Some(wgpu::Face::Back), true, Less),
        MaterialKind::Glow => (shaders::GLOW_WGSL, "fs_glow", None, false, Less),
        MaterialKind::Halo => (shaders::CORE_WGSL, "fs_halo", Some(wgpu::Face::Front), false, Less),
        MaterialKind::Ring => (shaders::RING_WGSL, "fs_ring", None, false, Less),
        MaterialKind::Filament => (shaders::DECOR_WGSL, "fs_filament", None, false, Always),
        MaterialKind::Nucleus => (shaders::DECOR_WGSL, "fs_nucleus", None, false, Always),
        MaterialKind::Particles => (shaders::POINTS_WGSL, "fs_points", None, false, Less),
    };
    PipelineSpec {
        source,
        fs,
        cull,
        depth_write,
        depth_compare,
    }
}

// Shaders output premultiplied colour to match the premultiplied canvas.
fn blend_state(blend: Blend) -> wgpu::BlendState {
    match blend {
        Blend::Opaque => wgpu::BlendState::REPLACE,
        Blend::Normal => wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        Blend::Additive => {
            let add = wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            };
            wgpu::BlendState {
                color: add,
                alpha: add,
            }
        }
    }
}

pub(crate) struct Layouts {
    pub(crate) uniforms: wgpu::BindGroupLayout, // per-draw uniform buffer
    pub(crate) texture: wgpu::BindGroupLayout,  // tex+sampler
}

impl Layouts {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
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
        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        Self { uniforms, texture }
    }
}

fn make_pipeline(
    device: &wgpu::Device,
    layouts: &Layouts,
    kind: MaterialKind,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let spec = spec(kind);
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(kind.label()),
        source: wgpu::ShaderSource::Wgsl(spec.source.into()),
    });
    let layout = if kind.textured() {
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_textured"),
            bind_group_layouts: &[&layouts.uniforms, &layouts.texture],
            push_constant_ranges: &[],
        })
    } else {
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_draw"),
            bind_group_layouts: &[&layouts.uniforms],
            push_constant_ranges: &[],
        })
    };
    let buffers = if kind.instanced() {
        vec![helpers::vertex_layout(), helpers::instance_layout()]
    } else {
        vec![helpers::vertex_layout()]
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(kind.label()),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: spec.cull,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write,
            depth_compare: spec.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(spec.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(blend_state(kind.blend())),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

pub(crate) struct Pipelines {
    entries: Vec<(MaterialKind, wgpu::RenderPipeline)>,
}

impl Pipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let entries = MaterialKind::ALL
            .iter()
            .map(|&kind| (kind, make_pipeline(device, layouts, kind, color_format)))
            .collect();
        Self { entries }
    }

    pub(crate) fn get(&self, kind: MaterialKind) -> Option<&wgpu::RenderPipeline> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, pipeline)| pipeline)
    }
}
