use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use super::helpers::{self, sampler_entry, texture_entry, uniform_entry};
use super::targets::{RenderTargets, TARGET_FORMAT};
use super::textures::FieldTexture;
use super::uniforms::{EnhanceUniforms, PainterlyUniforms, SourceUniforms};

/// Pipelines, layouts, uniform buffers and samplers for stages A, B and C.
/// Bind groups are rebuilt by the caller whenever a bound view changes.
pub(crate) struct Stages {
    pub(crate) source_pipeline: wgpu::RenderPipeline,
    pub(crate) painterly_pipeline: wgpu::RenderPipeline,
    pub(crate) enhance_pipeline: wgpu::RenderPipeline,
    source_bgl: wgpu::BindGroupLayout,
    painterly_bgl: wgpu::BindGroupLayout,
    enhance_bgl: wgpu::BindGroupLayout,
    pub(crate) source_ubo: wgpu::Buffer,
    pub(crate) painterly_ubo: wgpu::Buffer,
    pub(crate) enhance_ubo: wgpu::Buffer,
    linear_sampler: wgpu::Sampler,
    repeat_sampler: wgpu::Sampler,
}

impl Stages {
    pub(crate) fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let source_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("source_shader"),
            source: wgpu::ShaderSource::Wgsl(inkwash_core::SOURCE_WGSL.into()),
        });
        let painterly_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("painterly_shader"),
            source: wgpu::ShaderSource::Wgsl(inkwash_core::PAINTERLY_WGSL.into()),
        });
        let enhance_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("enhance_shader"),
            source: wgpu::ShaderSource::Wgsl(inkwash_core::ENHANCE_WGSL.into()),
        });

        // A: uniforms, current image, next image, linear sampler
        let source_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("source_bgl"),
            entries: &[
                uniform_entry(0),
                texture_entry(1, true),
                texture_entry(2, true),
                sampler_entry(3),
            ],
        });
        // B: uniforms, stage A target, linear sampler, field
        let painterly_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("painterly_bgl"),
            entries: &[
                uniform_entry(0),
                texture_entry(1, true),
                sampler_entry(2),
                texture_entry(3, false),
            ],
        });
        // C: uniforms, stage B target, field, grain, repeat sampler
        let enhance_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("enhance_bgl"),
            entries: &[
                uniform_entry(0),
                texture_entry(1, true),
                texture_entry(2, false),
                texture_entry(3, true),
                sampler_entry(4),
            ],
        });

        let layout = |label: &str, bgl: &wgpu::BindGroupLayout| {
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[bgl],
                push_constant_ranges: &[],
            })
        };
        let source_pl = layout("source_pl", &source_bgl);
        let painterly_pl = layout("painterly_pl", &painterly_bgl);
        let enhance_pl = layout("enhance_pl", &enhance_bgl);

        let source_pipeline = helpers::make_post_pipeline(
            device,
            "source_pipeline",
            &source_pl,
            &source_shader,
            "fs_source",
            TARGET_FORMAT,
        );
        let painterly_pipeline = helpers::make_post_pipeline(
            device,
            "painterly_pipeline",
            &painterly_pl,
            &painterly_shader,
            "fs_painterly",
            TARGET_FORMAT,
        );
        let enhance_pipeline = helpers::make_post_pipeline(
            device,
            "enhance_pipeline",
            &enhance_pl,
            &enhance_shader,
            "fs_enhance",
            surface_format,
        );

        let ubo = |label: &str, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let source_ubo = ubo("source_ubo", bytemuck::bytes_of(&SourceUniforms::zeroed()));
        let painterly_ubo = ubo(
            "painterly_ubo",
            bytemuck::bytes_of(&PainterlyUniforms::zeroed()),
        );
        let enhance_ubo = ubo("enhance_ubo", bytemuck::bytes_of(&EnhanceUniforms::zeroed()));

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let repeat_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("repeat_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            source_pipeline,
            painterly_pipeline,
            enhance_pipeline,
            source_bgl,
            painterly_bgl,
            enhance_bgl,
            source_ubo,
            painterly_ubo,
            enhance_ubo,
            linear_sampler,
            repeat_sampler,
        }
    }

    pub(crate) fn source_bind_group(
        &self,
        device: &wgpu::Device,
        current: &wgpu::TextureView,
        next: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_source"),
            layout: &self.source_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.source_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(current),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(next),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.linear_sampler),
                },
            ],
        })
    }

    pub(crate) fn painterly_bind_group(
        &self,
        device: &wgpu::Device,
        targets: &RenderTargets,
        field: &FieldTexture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_painterly"),
            layout: &self.painterly_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.painterly_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.source_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.linear_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&field.view),
                },
            ],
        })
    }

    pub(crate) fn enhance_bind_group(
        &self,
        device: &wgpu::Device,
        targets: &RenderTargets,
        field: &FieldTexture,
        grain: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_enhance"),
            layout: &self.enhance_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.enhance_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.painterly_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&field.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(grain),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.repeat_sampler),
                },
            ],
        })
    }
}
