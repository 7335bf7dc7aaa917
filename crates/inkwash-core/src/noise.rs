//! Value noise shared by the wash boundary and the procedural cell pattern.
//! `shaders/source.wgsl` carries the same functions; keep them in step.

use glam::Vec2;

/// Pseudo-random value in 0..1 for a lattice point.
#[inline]
pub fn hash21(p: Vec2) -> f32 {
    let h = (p.dot(Vec2::new(127.1, 311.7))).sin() * 43_758.547;
    h - h.floor()
}

/// Pseudo-random 2D offset in 0..1 for a lattice point.
#[inline]
pub fn hash22(p: Vec2) -> Vec2 {
    Vec2::new(hash21(p), hash21(p + Vec2::new(19.19, 47.31)))
}

/// Smoothly interpolated lattice noise in 0..1.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    let a = hash21(i);
    let b = hash21(i + Vec2::X);
    let c = hash21(i + Vec2::Y);
    let d = hash21(i + Vec2::ONE);
    let ab = a + (b - a) * u.x;
    let cd = c + (d - c) * u.x;
    ab + (cd - ab) * u.y
}

/// Fractal sum of `octaves` noise layers, each at double the frequency, half
/// the amplitude and a fresh offset. Normalized back to 0..1.
pub fn fbm(p: Vec2, octaves: usize) -> f32 {
    let mut sum = 0.0;
    let mut norm = 0.0;
    let mut amp = 0.5;
    let mut freq = 1.0;
    for k in 0..octaves {
        let offset = Vec2::new(k as f32 * 5.2, k as f32 * 1.3);
        sum += amp * value_noise(p * freq + offset);
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    if norm > 0.0 {
        sum / norm
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_stays_in_unit_range() {
        for i in 0..400 {
            let p = Vec2::new(i as f32 * 0.37 - 40.0, i as f32 * 0.11 + 3.0);
            let v = fbm(p, 3);
            assert!((0.0..=1.0).contains(&v), "{v} at {p}");
        }
    }

    #[test]
    fn value_noise_hits_lattice_hashes() {
        let p = Vec2::new(3.0, -2.0);
        assert!((value_noise(p) - hash21(p)).abs() < 1e-6);
    }

    #[test]
    fn zero_octaves_is_flat() {
        assert_eq!(fbm(Vec2::new(1.0, 2.0), 0), 0.5);
    }
}
