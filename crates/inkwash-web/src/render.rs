//! WebGPU renderer for the three composition stages.
//!
//! Each frame uploads the readable half of the displacement field, fills the
//! three uniform blocks from the orchestrator's [`FrameParams`], then runs
//! stage A into `source_tex`, stage B into `painterly_tex` and stage C into
//! the swapchain.

mod helpers;
mod stages;
mod targets;
mod textures;
mod uniforms;

use inkwash_core::{Error, FieldGrid, FrameParams, ImageSet, PipelineParams, GRAIN_TEXTURE_SIZE};
use web_sys as web;

use stages::Stages;
use targets::RenderTargets;
use textures::FieldTexture;
pub use textures::ImageTexture;
use uniforms::{EnhanceUniforms, PainterlyUniforms, SourceUniforms};

/// Slots bound to stage A, used to tell when its bind group is stale.
type SourceKey = (Option<usize>, Option<usize>);

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    width: u32,
    height: u32,

    targets: RenderTargets,
    stages: Stages,
    field: FieldTexture,
    _grain_tex: wgpu::Texture,
    grain_view: wgpu::TextureView,
    placeholder: ImageTexture,

    bg_source: wgpu::BindGroup,
    source_key: SourceKey,
    bg_painterly: wgpu::BindGroup,
    bg_enhance: wgpu::BindGroup,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement, field_size: u32) -> Result<Self, Error> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| Error::Unsupported(format!("create_surface: {e}")))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| Error::Unsupported("no WebGPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| Error::Unsupported(format!("request_device: {e}")))?;
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
            .ok_or_else(|| Error::Unsupported("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        let targets = RenderTargets::new(&device, width, height);
        let stages = Stages::new(&device, format);
        let field = FieldTexture::new(&device, field_size);
        let (grain_tex, grain_view) = textures::create_grain_texture(&device, &queue);
        let placeholder = ImageTexture::placeholder(&device, &queue);

        let bg_source = stages.source_bind_group(&device, &placeholder.view, &placeholder.view);
        let bg_painterly = stages.painterly_bind_group(&device, &targets, &field);
        let bg_enhance = stages.enhance_bind_group(&device, &targets, &field, &grain_view);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            width,
            height,
            targets,
            stages,
            field,
            _grain_tex: grain_tex,
            grain_view,
            placeholder,
            bg_source,
            source_key: (None, None),
            bg_painterly,
            bg_enhance,
        })
    }

    /// Decode target for a fetched image; the orchestrator owns the result.
    pub fn upload_image(&self, slot: usize, width: u32, height: u32, rgba: &[u8]) -> ImageTexture {
        ImageTexture::from_rgba8(
            &self.device,
            &self.queue,
            &format!("image_{}", slot),
            width,
            height,
            rgba,
        )
    }

    pub fn max_texture_side(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
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

            // Recreate offscreen render targets and dependent bind groups
            self.targets.recreate(&self.device, width, height);
            self.rebuild_post_bind_groups();
        }
    }

    /// Reconfigure after the surface was lost or went stale.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        params: &FrameParams,
        pipeline: &PipelineParams,
        field: &FieldGrid,
        images: &ImageSet<ImageTexture>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.resize_if_needed(params.width, params.height);
        self.refresh_source_bind_group(params, images);
        if params.field_enabled {
            self.field.upload(&self.queue, field);
        }

        let source = SourceUniforms::from_frame(params);
        let painterly = PainterlyUniforms::from_frame(params, pipeline, self.field.size);
        let enhance =
            EnhanceUniforms::from_frame(params, pipeline, self.field.size, GRAIN_TEXTURE_SIZE);
        self.queue
            .write_buffer(&self.stages.source_ubo, 0, bytemuck::bytes_of(&source));
        self.queue
            .write_buffer(&self.stages.painterly_ubo, 0, bytemuck::bytes_of(&painterly));
        self.queue
            .write_buffer(&self.stages.enhance_ubo, 0, bytemuck::bytes_of(&enhance));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: source image / wash / procedural -> source_tex
        helpers::blit(
            &mut encoder,
            "source_pass",
            &self.targets.source_view,
            &self.stages.source_pipeline,
            &self.bg_source,
        );
        // Pass 2: painterly filter + field reveal -> painterly_tex
        helpers::blit(
            &mut encoder,
            "painterly_pass",
            &self.targets.painterly_view,
            &self.stages.painterly_pipeline,
            &self.bg_painterly,
        );
        // Pass 3: enhancement -> swapchain
        helpers::blit(
            &mut encoder,
            "enhance_pass",
            &view,
            &self.stages.enhance_pipeline,
            &self.bg_enhance,
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl<'a> GpuState<'a> {
    fn rebuild_post_bind_groups(&mut self) {
        self.bg_painterly = self
            .stages
            .painterly_bind_group(&self.device, &self.targets, &self.field);
        self.bg_enhance = self.stages.enhance_bind_group(
            &self.device,
            &self.targets,
            &self.field,
            &self.grain_view,
        );
    }

    fn refresh_source_bind_group(&mut self, params: &FrameParams, images: &ImageSet<ImageTexture>) {
        let next = if params.is_washing() {
            params.next_image
        } else {
            None
        };
        let key = (params.current_image, next);
        if key == self.source_key {
            return;
        }
        let current = image_view(images, key.0, &self.placeholder.view);
        let next = image_view(images, key.1, &self.placeholder.view);
        self.bg_source = self.stages.source_bind_group(&self.device, current, next);
        self.source_key = key;
    }
}

fn image_view<'v>(
    images: &'v ImageSet<ImageTexture>,
    slot: Option<usize>,
    fallback: &'v wgpu::TextureView,
) -> &'v wgpu::TextureView {
    slot.and_then(|i| images.get(i))
        .map(|img| &img.payload.view)
        .unwrap_or(fallback)
}
