use rand::prelude::*;

use crate::constants::{GRAIN_SEED, GRAIN_TEXTURE_SIZE};

/// Tileable single-channel grain, uploaded once as an `R8Unorm` texture with
/// repeat addressing. Each texel is the average of a few uniform draws so the
/// distribution bunches around mid grey like paper tooth.
pub fn grain_texels(size: u32, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = (size as usize) * (size as usize);
    (0..n)
        .map(|_| {
            let v: u32 = (0..3).map(|_| rng.gen_range(0..=255u32)).sum();
            (v / 3) as u8
        })
        .collect()
}

pub fn default_grain() -> Vec<u8> {
    grain_texels(GRAIN_TEXTURE_SIZE, GRAIN_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grain_is_deterministic_per_seed() {
        assert_eq!(grain_texels(16, 3), grain_texels(16, 3));
        assert_ne!(grain_texels(16, 3), grain_texels(16, 4));
    }

    #[test]
    fn grain_has_texture_size_and_mid_grey_mean() {
        let g = default_grain();
        assert_eq!(g.len(), (GRAIN_TEXTURE_SIZE * GRAIN_TEXTURE_SIZE) as usize);
        let mean = g.iter().map(|&v| v as f64).sum::<f64>() / g.len() as f64;
        assert!((mean - 127.5).abs() < 4.0, "mean {mean}");
    }
}
