//! Enhancement stage operators. Each one is scaled by `1 - reveal`, so the
//! revealed source comes through untouched.

use glam::{Vec2, Vec3};

use super::luminance;
use crate::config::PipelineParams;
use crate::constants::*;
use crate::field::smoothstep;

/// Smooth reveal ramp centred on the threshold.
#[inline]
pub fn reveal_smooth(height: f32, threshold: f32) -> f32 {
    1.0 - smoothstep(threshold - REVEAL_SOFTNESS, threshold + REVEAL_SOFTNESS, height)
}

/// Sobel gradient magnitude of a 3x3 luminance neighbourhood in row-major
/// order.
pub fn sobel_magnitude(l: &[f32; 9]) -> f32 {
    let gx = (l[2] + 2.0 * l[5] + l[8]) - (l[0] + 2.0 * l[3] + l[6]);
    let gy = (l[6] + 2.0 * l[7] + l[8]) - (l[0] + 2.0 * l[1] + l[2]);
    (gx * gx + gy * gy).sqrt()
}

#[inline]
pub fn edge_darken(c: Vec3, magnitude: f32, strength: f32) -> Vec3 {
    c * (1.0 - strength * magnitude.clamp(0.0, 1.0))
}

/// Push colour away from (or toward) its luminance grey.
#[inline]
pub fn saturate(c: Vec3, amount: f32) -> Vec3 {
    let grey = Vec3::splat(luminance(c));
    grey + (c - grey) * amount
}

/// Multiply in a grain sample in 0..1 at a fraction of the paper strength.
#[inline]
pub fn apply_grain(c: Vec3, grain: f32, paper: f32) -> Vec3 {
    c * (1.0 + (grain - 0.5) * paper * GRAIN_MIX)
}

/// Radial darkening toward the corners.
#[inline]
pub fn vignette(c: Vec3, uv: Vec2, strength: f32) -> Vec3 {
    let d = (uv - Vec2::splat(0.5)).length() * std::f32::consts::SQRT_2;
    c * (1.0 - strength * smoothstep(VIGNETTE_INNER, VIGNETTE_OUTER, d))
}

/// Linear contrast around mid grey.
#[inline]
pub fn contrast(c: Vec3, amount: f32) -> Vec3 {
    (c - Vec3::splat(0.5)) * amount + Vec3::splat(0.5)
}

/// Inputs the enhancement stage reads for one pixel besides its colour.
#[derive(Clone, Copy, Debug)]
pub struct EnhanceSample {
    pub uv: Vec2,
    /// Luminance of the 3x3 neighbourhood, row-major.
    pub neighbourhood: [f32; 9],
    pub grain: f32,
    pub reveal: f32,
}

pub fn enhance_pixel(c: Vec3, s: &EnhanceSample, params: &PipelineParams) -> Vec3 {
    let k = 1.0 - s.reveal.clamp(0.0, 1.0);
    let mut out = c;
    if params.edge_detection {
        out = edge_darken(out, sobel_magnitude(&s.neighbourhood), params.edge_darkening * k);
    }
    out = saturate(out, 1.0 + (params.saturation - 1.0) * k);
    out = apply_grain(out, s.grain, params.paper * k);
    out = vignette(out, s.uv, params.vignette * k);
    out = contrast(out, 1.0 + (params.contrast - 1.0) * k);
    out.clamp(Vec3::ZERO, Vec3::ONE)
}
