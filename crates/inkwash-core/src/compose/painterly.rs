//! Painterly stage: a four-quadrant edge-preserving smoothing filter, plus
//! the field-driven reveal of the unfiltered source with refraction and an
//! edge shadow.

use glam::{IVec2, Vec2, Vec3};

use super::{luminance, Raster};
use crate::constants::*;
use crate::field::{smoothstep, FieldGrid};

/// Mean colour of one quadrant and its per-channel variance, weighted to a
/// scalar by luminance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadrantStats {
    pub mean: Vec3,
    pub variance: f32,
}

/// Quadrant directions, in the order ties are resolved.
pub const QUADRANTS: [IVec2; 4] = [
    IVec2::new(-1, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
    IVec2::new(1, 1),
];

/// Offsets of the fixed 3x3 sample grid along one axis of a quadrant.
pub fn grid_offsets(radius: u32) -> [i32; 3] {
    let r = radius as f32;
    [0, (r * 0.5).round() as i32, radius as i32]
}

pub fn quadrant_stats(src: &Raster, at: IVec2, dir: IVec2, radius: u32) -> QuadrantStats {
    let offs = grid_offsets(radius);
    let mut sum = Vec3::ZERO;
    let mut sum_sq = Vec3::ZERO;
    for oy in offs {
        for ox in offs {
            let p = at + dir * IVec2::new(ox, oy);
            let c = src.at_clamped(p.x, p.y);
            sum += c;
            sum_sq += c * c;
        }
    }
    let n = 9.0;
    let mean = sum / n;
    QuadrantStats {
        mean,
        variance: luminance((sum_sq / n - mean * mean).max(Vec3::ZERO)),
    }
}

/// Mean of the most homogeneous quadrant around `at`.
pub fn painterly_pixel(src: &Raster, at: IVec2, radius: u32) -> Vec3 {
    let mut best = quadrant_stats(src, at, QUADRANTS[0], radius);
    for dir in &QUADRANTS[1..] {
        let s = quadrant_stats(src, at, *dir, radius);
        if s.variance < best.variance {
            best = s;
        }
    }
    best.mean
}

pub fn painterly_filter(src: &Raster, radius: u32) -> Raster {
    Raster::from_fn(src.width(), src.height(), |x, y| {
        painterly_pixel(src, IVec2::new(x as i32, y as i32), radius)
    })
}

/// Central-difference height gradient at the cell nearest `uv`, in height
/// units per cell.
pub fn field_gradient(field: &FieldGrid, uv: Vec2) -> Vec2 {
    let x = (uv.x * field.width() as f32).floor() as i32;
    let y = (uv.y * field.height() as f32).floor() as i32;
    let dx = field.at_clamped(x + 1, y).height - field.at_clamped(x - 1, y).height;
    let dy = field.at_clamped(x, y + 1).height - field.at_clamped(x, y - 1).height;
    Vec2::new(dx, dy) * 0.5
}

/// Hard reveal: the source shows through fully wherever the field is below
/// the threshold.
#[inline]
pub fn reveal_hard(height: f32, threshold: f32) -> f32 {
    if height < threshold {
        1.0
    } else {
        0.0
    }
}

/// Reveal factor around the pointer when no field is available.
pub fn fallback_reveal(uv: Vec2, pointer: Vec2, aspect: f32, radius: f32, softness: f32) -> f32 {
    let d = ((uv - pointer) * Vec2::new(aspect.max(1e-3), 1.0)).length();
    1.0 - smoothstep(radius, radius + softness, d)
}

/// Where to read the unfiltered source for a revealed pixel.
#[inline]
pub fn refract_uv(uv: Vec2, gradient: Vec2) -> Vec2 {
    (uv + gradient * REFRACTION_STRENGTH).clamp(Vec2::ZERO, Vec2::ONE)
}

/// Darkening multiplier for the narrow band where the field crosses the
/// reveal threshold.
pub fn edge_shadow(height: f32, gradient: Vec2, threshold: f32) -> f32 {
    let band = 1.0 - smoothstep(0.0, EDGE_SHADOW_BAND, (height - threshold).abs());
    let weight = (gradient.length() * GRADIENT_GAIN).clamp(0.0, 1.0);
    1.0 - EDGE_SHADOW_STRENGTH * band * weight
}

/// Final painterly output for one pixel.
pub fn painterly_composite(
    filtered: Vec3,
    source: Vec3,
    height: f32,
    gradient: Vec2,
    threshold: f32,
) -> Vec3 {
    let reveal = reveal_hard(height, threshold);
    filtered.lerp(source, reveal) * edge_shadow(height, gradient, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldCell;

    #[test]
    fn uniform_neighbourhood_passes_through() {
        let c = Vec3::new(0.25, 0.5, 0.75);
        let src = Raster::filled(16, 16, c);
        for radius in [KERNEL_RADIUS_REDUCED, KERNEL_RADIUS_FULL] {
            assert_eq!(painterly_pixel(&src, IVec2::new(8, 8), radius), c);
            assert_eq!(painterly_pixel(&src, IVec2::new(0, 15), radius), c);
        }
    }

    #[test]
    fn hard_edge_is_preserved() {
        let dark = Vec3::splat(0.125);
        let light = Vec3::splat(0.875);
        let src = Raster::from_fn(16, 16, |x, _| if x < 8 { dark } else { light });
        let out = painterly_filter(&src, KERNEL_RADIUS_REDUCED);
        // pixels right next to the edge keep their own side's colour
        assert_eq!(out.at_clamped(7, 8), dark);
        assert_eq!(out.at_clamped(8, 8), light);
    }

    #[test]
    fn quadrant_variance_is_non_negative() {
        let src = Raster::from_fn(8, 8, |x, y| Vec3::splat(((x * 7 + y * 3) % 5) as f32 / 5.0));
        for dir in QUADRANTS {
            let s = quadrant_stats(&src, IVec2::new(4, 4), dir, KERNEL_RADIUS_FULL);
            assert!(s.variance >= 0.0);
        }
    }

    #[test]
    fn isoluminant_chroma_edge_is_not_averaged() {
        // red and green of equal luminance
        let red = Vec3::new(1.0, 0.0, 0.0);
        let green = Vec3::new(0.0, 0.299 / 0.587, 0.0);
        assert!((luminance(red) - luminance(green)).abs() < 1e-6);
        let src = Raster::from_fn(17, 17, |x, y| {
            if x <= 8 && y <= 8 {
                if (x + y) % 2 == 0 { red } else { green }
            } else {
                Vec3::splat(0.4 + ((x * 3 + y) % 3) as f32 * 0.02)
            }
        });
        let at = IVec2::new(8, 8);
        let radius = KERNEL_RADIUS_REDUCED;
        let checker = quadrant_stats(&src, at, QUADRANTS[0], radius);
        for dir in &QUADRANTS[1..] {
            assert!(checker.variance > quadrant_stats(&src, at, *dir, radius).variance);
        }
        // the mostly grey quadrant wins, not the red/green blend
        let out = painterly_pixel(&src, at, radius);
        assert_eq!(out, quadrant_stats(&src, at, QUADRANTS[3], radius).mean);
        assert_ne!(out, checker.mean);
    }

    #[test]
    fn refraction_shifts_along_gradient() {
        let uv = Vec2::new(0.5, 0.5);
        let g = Vec2::new(0.5, -1.0);
        let shifted = refract_uv(uv, g);
        assert!((shifted - (uv + g * REFRACTION_STRENGTH)).length() < 1e-6);
        assert_eq!(refract_uv(uv, Vec2::ZERO), uv);
    }

    #[test]
    fn refraction_stays_inside_the_image() {
        let huge = Vec2::new(1e3, -1e3);
        assert_eq!(refract_uv(Vec2::new(0.99, 0.01), huge), Vec2::new(1.0, 0.0));
        assert_eq!(refract_uv(Vec2::new(0.01, 0.99), -huge), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn reveal_is_a_hard_step() {
        assert_eq!(reveal_hard(-0.26, -0.25), 1.0);
        assert_eq!(reveal_hard(-0.25, -0.25), 0.0);
        assert_eq!(reveal_hard(0.0, -0.25), 0.0);
    }

    #[test]
    fn untouched_field_shows_filtered_colour() {
        let filtered = Vec3::splat(0.4);
        let out = painterly_composite(filtered, Vec3::ONE, 0.0, Vec2::ZERO, REVEAL_THRESHOLD);
        assert_eq!(out, filtered);
    }

    #[test]
    fn shadow_only_near_threshold_with_slope() {
        let g = Vec2::new(0.5, 0.0);
        assert!(edge_shadow(REVEAL_THRESHOLD, g, REVEAL_THRESHOLD) < 1.0);
        assert_eq!(edge_shadow(REVEAL_THRESHOLD, Vec2::ZERO, REVEAL_THRESHOLD), 1.0);
        assert_eq!(edge_shadow(0.0, g, REVEAL_THRESHOLD), 1.0);
    }

    #[test]
    fn gradient_points_uphill() {
        let mut f = FieldGrid::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                f.set(x, y, FieldCell { height: -1.0 + x as f32 / 8.0, velocity: 0.0 });
            }
        }
        let g = field_gradient(&f, Vec2::splat(0.5));
        assert!(g.x > 0.0);
        assert_eq!(g.y, 0.0);
    }

    #[test]
    fn fallback_reveal_is_centred_on_pointer() {
        let p = Vec2::new(0.3, 0.6);
        assert_eq!(fallback_reveal(p, p, 1.0, 0.1, 0.05), 1.0);
        assert_eq!(fallback_reveal(Vec2::new(0.9, 0.6), p, 1.0, 0.1, 0.05), 0.0);
    }
}
