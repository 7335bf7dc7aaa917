use glam::{Vec2, Vec3};

/// Map a pointer position in client (CSS) pixels onto canvas UV.
///
/// `rect` is the canvas bounding rect as `[left, top, width, height]`.
/// UV is clamped to the canvas; a degenerate rect maps to its centre.
#[inline]
pub fn client_to_uv(client_x: f64, client_y: f64, rect: [f64; 4]) -> Vec2 {
    let [left, top, w, h] = rect;
    if !(w > 0.0 && h > 0.0) {
        return Vec2::splat(0.5);
    }
    let u = ((client_x - left) / w).clamp(0.0, 1.0);
    let v = ((client_y - top) / h).clamp(0.0, 1.0);
    if u.is_finite() && v.is_finite() {
        Vec2::new(u as f32, v as f32)
    } else {
        Vec2::splat(0.5)
    }
}

/// True when the client position lies inside the rect (edges inclusive).
#[inline]
pub fn client_inside(client_x: f64, client_y: f64, rect: [f64; 4]) -> bool {
    let [left, top, w, h] = rect;
    client_x >= left && client_x <= left + w && client_y >= top && client_y <= top + h
}

/// Read an `[r, g, b]` colour handed over from JS.
///
/// Components in 0..1 are taken as-is; if any component exceeds 1 the triple
/// is treated as 0..255. Anything other than three finite numbers is rejected.
pub fn color_from_js(components: &[f32]) -> Option<Vec3> {
    let [r, g, b] = <[f32; 3]>::try_from(components).ok()?;
    let c = Vec3::new(r, g, b);
    if !c.is_finite() {
        return None;
    }
    let c = if c.max_element() > 1.0 { c / 255.0 } else { c };
    Some(c.clamp(Vec3::ZERO, Vec3::ONE))
}
