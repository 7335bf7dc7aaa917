//! Source stage: image placement, the wash boundary between two images, and
//! the procedural cell pattern shown before any image has loaded.

use glam::{Mat2, Vec2, Vec3};

use crate::color::ColorPair;
use crate::constants::*;
use crate::field::smoothstep;
use crate::noise::{fbm, hash21, hash22};

/// Maps screen UV to image UV so the image covers the screen.
///
/// The image is scaled to fill the wider screen dimension and cropped on the
/// other axis. The visible fraction of the cropped axis never drops below
/// `COVER_MIN_SCALE`; past that the image stretches instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverTransform {
    /// Visible fraction of the image on each axis.
    pub scale: Vec2,
    pub offset: Vec2,
}

impl Default for CoverTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CoverTransform {
    pub const IDENTITY: Self = Self {
        scale: Vec2::ONE,
        offset: Vec2::ZERO,
    };

    pub fn new(image_aspect: f32, screen_aspect: f32) -> Self {
        if !(image_aspect.is_finite() && screen_aspect.is_finite())
            || image_aspect <= 0.0
            || screen_aspect <= 0.0
        {
            return Self::IDENTITY;
        }
        let scale = if screen_aspect > image_aspect {
            // screen is wider: full width, crop top and bottom
            Vec2::new(1.0, (image_aspect / screen_aspect).max(COVER_MIN_SCALE))
        } else {
            Vec2::new((screen_aspect / image_aspect).max(COVER_MIN_SCALE), 1.0)
        };
        Self {
            scale,
            offset: (Vec2::ONE - scale) * 0.5,
        }
    }

    #[inline]
    pub fn apply(&self, uv: Vec2) -> Vec2 {
        uv * self.scale + self.offset
    }

    /// True when the two transforms place content differently enough that
    /// field state painted under one no longer lines up under the other.
    pub fn differs_from(&self, other: &CoverTransform) -> bool {
        (self.scale - other.scale).abs().max_element() > 1e-4
    }
}

/// Position of the wash boundary along the rotated sweep axis at progress `p`.
pub fn sweep_position(progress: f32) -> f32 {
    let eased = smoothstep(0.0, 1.0, progress);
    WASH_SWEEP_START + (WASH_SWEEP_END - WASH_SWEEP_START) * eased
}

/// Rotate `uv` about the centre of the unit square.
#[inline]
pub fn rotate_about_centre(uv: Vec2, angle: f32) -> Vec2 {
    Mat2::from_angle(angle) * (uv - Vec2::splat(0.5)) + Vec2::splat(0.5)
}

/// Blend weight of the incoming image at `uv`: 0 shows the current image, 1
/// the next.
pub fn wash_mask(uv: Vec2, progress: f32, angle: f32) -> f32 {
    if progress.is_nan() || progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let local = rotate_about_centre(uv, angle);
    let noise = (fbm(local * 3.0, WASH_NOISE_OCTAVES) - 0.5) * 2.0 * WASH_NOISE_AMPLITUDE;
    let d = local.x + noise - sweep_position(progress);
    1.0 - smoothstep(-WASH_FEATHER, WASH_FEATHER, d)
}

/// Distances to the nearest and second-nearest animated seed of a cell grid
/// with `cells` seeds per side.
pub fn cell_distances(uv: Vec2, time: f32, cells: f32) -> (f32, f32) {
    let p = uv * cells;
    let base = p.floor();
    let mut f1 = f32::MAX;
    let mut f2 = f32::MAX;
    for j in -1..=1 {
        for i in -1..=1 {
            let cell = base + Vec2::new(i as f32, j as f32);
            let phase = hash22(cell) * std::f32::consts::TAU;
            let wobble = Vec2::new((time * 0.4 + phase.x).sin(), (time * 0.3 + phase.y).cos());
            let seed = cell + Vec2::splat(0.5) + wobble * 0.35;
            let d = (p - seed).length();
            if d < f1 {
                f2 = f1;
                f1 = d;
            } else if d < f2 {
                f2 = d;
            }
        }
    }
    (f1, f2)
}

/// Fallback pattern: cells tinted from the section colours with darker seams.
pub fn procedural_cells(uv: Vec2, time: f32, colors: &ColorPair) -> Vec3 {
    let (f1, f2) = cell_distances(uv, time, PROCEDURAL_CELLS);
    let seam = smoothstep(0.0, 0.12, f2 - f1);
    let cell_id = hash21((uv * PROCEDURAL_CELLS).floor());
    let fill = colors.primary.lerp(colors.secondary, cell_id * 0.6 + f1 * 0.4);
    let seam_colour = colors.primary * 0.6;
    seam_colour.lerp(fill, seam).clamp(Vec3::ZERO, Vec3::ONE)
}
