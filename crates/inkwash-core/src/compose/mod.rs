//! Host-side reference versions of the per-pixel work done by the three
//! composition shaders. The renderer uses the cover transform and wash sweep
//! directly; everything else is the tested definition of what the WGSL in
//! `shaders/` computes.

pub mod enhance;
pub mod painterly;
pub mod source;

use glam::{Vec2, Vec3};

pub use enhance::*;
pub use painterly::*;
pub use source::*;

use crate::constants::LUMA_WEIGHTS;

#[inline]
pub fn luminance(c: Vec3) -> f32 {
    c.dot(Vec3::from(LUMA_WEIGHTS))
}

/// A small RGB image with clamp-to-edge reads.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl Raster {
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Vec3) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn filled(width: usize, height: usize, c: Vec3) -> Self {
        Self::from_fn(width, height, |_, _| c)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn at_clamped(&self, x: i32, y: i32) -> Vec3 {
        if self.pixels.is_empty() {
            return Vec3::ZERO;
        }
        let cx = x.clamp(0, self.width as i32 - 1) as usize;
        let cy = y.clamp(0, self.height as i32 - 1) as usize;
        self.pixels[cy * self.width + cx]
    }

    /// Nearest pixel to a normalized coordinate.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let x = (uv.x * self.width as f32).floor() as i32;
        let y = (uv.y * self.height as f32).floor() as i32;
        self.at_clamped(x, y)
    }
}
