use inkwash_core::{FieldGrid, GRAIN_TEXTURE_SIZE};

use super::helpers;

/// Decoded source image resident on the GPU. Held by the orchestrator's
/// image set as the slot payload.
pub struct ImageTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl ImageTexture {
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Self {
        let (texture, view) = helpers::create_color_texture(
            device,
            label,
            width,
            height,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        helpers::write_texture_2d(queue, &texture, rgba, 4, width, height);
        Self { texture, view }
    }

    /// Bound in place of a missing image so the source layout stays fixed.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba8(device, queue, "placeholder_tex", 1, 1, &[0, 0, 0, 255])
    }
}

/// The readable half of the displacement field, re-uploaded every frame.
///
/// Rg32Float (height, velocity) is not filterable; the shaders read it with
/// `textureLoad` and interpolate themselves.
pub struct FieldTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub size: u32,
}

impl FieldTexture {
    pub fn new(device: &wgpu::Device, size: u32) -> Self {
        let (texture, view) = helpers::create_color_texture(
            device,
            "field_tex",
            size,
            size,
            wgpu::TextureFormat::Rg32Float,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        Self {
            texture,
            view,
            size: size.max(1),
        }
    }

    pub fn upload(&self, queue: &wgpu::Queue, grid: &FieldGrid) {
        if grid.width() as u32 != self.size || grid.height() as u32 != self.size {
            log::warn!(
                "[field] grid {}x{} does not match texture {}",
                grid.width(),
                grid.height(),
                self.size
            );
            return;
        }
        let bytes: &[u8] = bytemuck::cast_slice(grid.cells());
        helpers::write_texture_2d(queue, &self.texture, bytes, 8, self.size, self.size);
    }
}

pub fn create_grain_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> (wgpu::Texture, wgpu::TextureView) {
    let size = GRAIN_TEXTURE_SIZE;
    let (texture, view) = helpers::create_color_texture(
        device,
        "grain_tex",
        size,
        size,
        wgpu::TextureFormat::R8Unorm,
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    );
    let texels = inkwash_core::grain::default_grain();
    helpers::write_texture_2d(queue, &texture, &texels, 1, size, size);
    (texture, view)
}
