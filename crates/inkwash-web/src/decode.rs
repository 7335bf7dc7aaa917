// Image decoding for fetched background images. Kept free of web APIs so the
// host can test it.

use image::imageops::FilterType;

/// RGBA8 pixels ready for upload.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Largest size that fits in `max_side` on both axes with the aspect kept.
pub fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let max_side = max_side.max(1);
    if width <= max_side && height <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / width.max(height) as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_side);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_side);
    (w, h)
}

/// Decode PNG/JPEG/WebP bytes, downscaling anything larger than the device's
/// texture limit.
pub fn decode_image(bytes: &[u8], max_side: u32) -> anyhow::Result<DecodedImage> {
    let img = image::load_from_memory(bytes)?;
    let (w, h) = fit_within(img.width(), img.height(), max_side);
    let img = if (w, h) != (img.width(), img.height()) {
        img.resize_exact(w, h, FilterType::Triangle)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        anyhow::bail!("image has no pixels");
    }
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
