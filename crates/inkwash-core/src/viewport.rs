/// Canvas size in CSS pixels plus the backing-store size actually rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    /// Device pixel ratio after the cap.
    pub device_pixel_ratio: f64,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Size the backing store from CSS size and the reported device pixel
    /// ratio, capped at `max_dpr`. Never returns a zero dimension.
    pub fn from_css(css_width: f64, css_height: f64, device_pixel_ratio: f64, max_dpr: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(max_dpr)
        } else {
            1.0
        };
        let css_width = finite_non_negative(css_width);
        let css_height = finite_non_negative(css_height);
        Self {
            css_width,
            css_height,
            device_pixel_ratio: dpr,
            width: ((css_width * dpr).round() as u32).max(1),
            height: ((css_height * dpr).round() as u32).max(1),
        }
    }

    /// Width / height of the backing store.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_css(1.0, 1.0, 1.0, 1.0)
    }
}

fn finite_non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpr_is_capped() {
        let v = Viewport::from_css(800.0, 600.0, 3.0, 2.0);
        assert_eq!((v.width, v.height), (1600, 1200));
        assert_eq!(v.device_pixel_ratio, 2.0);
    }

    #[test]
    fn zero_size_is_clamped_to_one_pixel() {
        let v = Viewport::from_css(0.0, 0.0, 1.0, 2.0);
        assert_eq!((v.width, v.height), (1, 1));
        assert_eq!(v.aspect(), 1.0);
    }
}
