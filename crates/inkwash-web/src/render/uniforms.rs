// Uniform blocks for the three composition stages. Field order and padding
// mirror the WGSL structs in `inkwash-core/shaders`.

use bytemuck::{Pod, Zeroable};
use inkwash_core::{FrameParams, PipelineParams};

#[inline]
fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SourceUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub wash_progress: f32,
    pub current_scale: [f32; 2],
    pub current_offset: [f32; 2],
    pub next_scale: [f32; 2],
    pub next_offset: [f32; 2],
    pub primary: [f32; 4],
    pub secondary: [f32; 4],
    pub wash_angle: f32,
    pub has_image: f32,
    pub washing: f32,
    pub _pad: f32,
}

impl SourceUniforms {
    pub fn from_frame(p: &FrameParams) -> Self {
        Self {
            resolution: [p.width as f32, p.height as f32],
            time: p.time,
            wash_progress: p.wash_progress,
            current_scale: p.current_cover.scale.to_array(),
            current_offset: p.current_cover.offset.to_array(),
            next_scale: p.next_cover.scale.to_array(),
            next_offset: p.next_cover.offset.to_array(),
            primary: p.colors.primary.extend(1.0).to_array(),
            secondary: p.colors.secondary.extend(1.0).to_array(),
            wash_angle: p.wash_angle,
            has_image: flag(p.current_image.is_some()),
            washing: flag(p.is_washing()),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PainterlyUniforms {
    pub resolution: [f32; 2],
    pub field_size: [f32; 2],
    pub pointer: [f32; 2],
    pub aspect: f32,
    pub radius: f32,
    pub reveal_threshold: f32,
    pub field_enabled: f32,
    pub fallback_radius: f32,
    pub fallback_softness: f32,
}

impl PainterlyUniforms {
    pub fn from_frame(p: &FrameParams, pipeline: &PipelineParams, field_size: u32) -> Self {
        Self {
            resolution: [p.width as f32, p.height as f32],
            field_size: [field_size as f32; 2],
            pointer: p.pointer.to_array(),
            aspect: p.aspect(),
            radius: pipeline.kernel_radius.pixels() as f32,
            reveal_threshold: pipeline.reveal_threshold,
            field_enabled: flag(p.field_enabled),
            fallback_radius: fallback_radius(p, pipeline),
            fallback_softness: pipeline.fallback_reveal_softness,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct EnhanceUniforms {
    pub resolution: [f32; 2],
    pub field_size: [f32; 2],
    pub pointer: [f32; 2],
    pub aspect: f32,
    pub reveal_threshold: f32,
    pub edge_darkening: f32,
    pub paper: f32,
    pub saturation: f32,
    pub vignette: f32,
    pub contrast: f32,
    pub edge_detection: f32,
    pub field_enabled: f32,
    pub fallback_radius: f32,
    pub fallback_softness: f32,
    pub grain_size: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl EnhanceUniforms {
    pub fn from_frame(
        p: &FrameParams,
        pipeline: &PipelineParams,
        field_size: u32,
        grain_size: u32,
    ) -> Self {
        Self {
            resolution: [p.width as f32, p.height as f32],
            field_size: [field_size as f32; 2],
            pointer: p.pointer.to_array(),
            aspect: p.aspect(),
            reveal_threshold: pipeline.reveal_threshold,
            edge_darkening: pipeline.edge_darkening,
            paper: pipeline.paper,
            saturation: pipeline.saturation,
            vignette: pipeline.vignette,
            contrast: pipeline.contrast,
            edge_detection: flag(pipeline.edge_detection),
            field_enabled: flag(p.field_enabled),
            fallback_radius: fallback_radius(p, pipeline),
            fallback_softness: pipeline.fallback_reveal_softness,
            grain_size: grain_size.max(1) as f32,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

/// The pointer mask closes while the pointer is away.
#[inline]
fn fallback_radius(p: &FrameParams, pipeline: &PipelineParams) -> f32 {
    if p.pointer_active {
        pipeline.fallback_reveal_radius
    } else {
        -pipeline.fallback_reveal_softness
    }
}
