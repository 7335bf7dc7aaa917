use super::helpers;

pub(crate) const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen colour targets between the composition stages.
///
/// - `source_*` holds stage A (cover-mapped image, wash, procedural pattern).
/// - `painterly_*` holds stage B; stage C reads it and writes the swapchain.
///
/// Both are full resolution Rgba16Float and are rebuilt on resize.
pub(crate) struct RenderTargets {
    pub(crate) source_tex: wgpu::Texture,
    pub(crate) source_view: wgpu::TextureView,
    pub(crate) painterly_tex: wgpu::Texture,
    pub(crate) painterly_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (source_tex, source_view) = create_target(device, "source_tex", width, height);
        let (painterly_tex, painterly_view) = create_target(device, "painterly_tex", width, height);
        Self {
            source_tex,
            source_view,
            painterly_tex,
            painterly_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        (self.source_tex, self.source_view) = create_target(device, "source_tex", width, height);
        (self.painterly_tex, self.painterly_view) =
            create_target(device, "painterly_tex", width, height);
    }
}

fn create_target(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    helpers::create_color_texture(
        device,
        label,
        width,
        height,
        TARGET_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    )
}
