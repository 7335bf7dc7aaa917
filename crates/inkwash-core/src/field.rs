//! Displacement field simulation.
//!
//! The field is a square grid of `(height, velocity)` cells. Height 0 is the
//! untouched painted surface; -1 is fully "washed through", where the
//! composition stages reveal the unfiltered source. Each frame one step
//! reads the current buffer and writes the other, then the roles swap.

use glam::Vec2;

use crate::config::SimulationParams;
use crate::constants::*;

/// One simulation cell. Laid out as two `f32`s so a grid uploads directly as
/// an `Rg32Float` texture.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FieldCell {
    pub height: f32,
    pub velocity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldGrid {
    width: usize,
    height: usize,
    cells: Vec<FieldCell>,
}

impl FieldGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![FieldCell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[FieldCell] {
        &self.cells
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell at `(x, y)`, clamping out-of-range coordinates to the border.
    #[inline]
    pub fn at_clamped(&self, x: i32, y: i32) -> FieldCell {
        let cx = x.clamp(0, self.width as i32 - 1) as usize;
        let cy = y.clamp(0, self.height as i32 - 1) as usize;
        self.cells[self.idx(cx, cy)]
    }

    /// Nearest cell to a normalized coordinate.
    pub fn sample(&self, uv: Vec2) -> FieldCell {
        let x = (uv.x * self.width as f32).floor() as i32;
        let y = (uv.y * self.height as f32).floor() as i32;
        self.at_clamped(x, y)
    }

    pub fn set(&mut self, x: usize, y: usize, cell: FieldCell) {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(FieldCell::default());
    }

    pub fn min_height(&self) -> f32 {
        self.cells.iter().map(|c| c.height).fold(HEIGHT_MAX, f32::min)
    }

    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|c| *c == FieldCell::default())
    }
}

/// Arena of exactly two same-shaped buffers with a role flag.
///
/// `split` hands out the readable slot and the writable slot as disjoint
/// borrows, so a step cannot read the buffer it is writing.
#[derive(Clone, Debug)]
pub struct PingPong<T> {
    slots: [T; 2],
    current: usize,
    steps: u64,
}

impl<T> PingPong<T> {
    pub fn new(a: T, b: T) -> Self {
        Self {
            slots: [a, b],
            current: 0,
            steps: 0,
        }
    }

    pub fn current(&self) -> &T {
        &self.slots[self.current]
    }

    /// Index of the readable slot; equals `steps() % 2`.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// `(read, write)` borrows of the two slots.
    pub fn split(&mut self) -> (&T, &mut T) {
        let [a, b] = &mut self.slots;
        if self.current == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        }
    }

    /// Run `f(read, write)` and make the written slot current.
    pub fn advance(&mut self, f: impl FnOnce(&T, &mut T)) {
        let (read, write) = self.split();
        f(read, write);
        self.current ^= 1;
        self.steps += 1;
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for slot in &mut self.slots {
            f(slot);
        }
    }
}

/// Per-step inputs that change every frame.
#[derive(Clone, Copy, Debug)]
pub struct StepInput {
    /// Smoothed pointer position in normalized viewport coordinates.
    pub pointer: Vec2,
    pub pointer_active: bool,
    /// Movement intensity in 0..1; scales expansion speed.
    pub intensity: f32,
    /// Viewport width / height, for round brushes on non-square screens.
    pub aspect: f32,
    /// Elapsed seconds; rotates the diffusion ring.
    pub time: f32,
}

impl Default for StepInput {
    fn default() -> Self {
        Self {
            pointer: Vec2::splat(0.5),
            pointer_active: false,
            intensity: 0.0,
            aspect: 1.0,
            time: 0.0,
        }
    }
}

pub struct DisplacementField {
    buffers: PingPong<FieldGrid>,
}

impl DisplacementField {
    pub fn new(resolution: u32) -> Self {
        let n = resolution.max(1) as usize;
        Self {
            buffers: PingPong::new(FieldGrid::new(n, n), FieldGrid::new(n, n)),
        }
    }

    pub fn resolution(&self) -> u32 {
        self.buffers.current().width() as u32
    }

    pub fn current(&self) -> &FieldGrid {
        self.buffers.current()
    }

    /// Readable buffer index; alternates every step.
    pub fn parity(&self) -> usize {
        self.buffers.current_index()
    }

    pub fn steps(&self) -> u64 {
        self.buffers.steps()
    }

    pub fn step(&mut self, params: &SimulationParams, input: &StepInput) {
        self.buffers
            .advance(|src, dst| step_grid(src, dst, params, input));
    }

    /// Zero both buffers. Required whenever the image mapping changes, since
    /// old displacement would no longer line up with the new content.
    pub fn clear(&mut self) {
        self.buffers.for_each_mut(FieldGrid::clear);
        log::info!("[field] cleared {}x{}", self.resolution(), self.resolution());
    }
}

/// Offsets of the 8 diffusion ring samples at a given time. The ring angle is
/// shared by all cells in a step, so this runs once per step.
pub fn ring_offsets(time: f32) -> [(i32, i32); RING_SAMPLES] {
    let base = if time.is_finite() {
        time * RING_ROTATION_SPEED
    } else {
        0.0
    };
    let mut out = [(0, 0); RING_SAMPLES];
    for (k, o) in out.iter_mut().enumerate() {
        let a = base + k as f32 * std::f32::consts::TAU / RING_SAMPLES as f32;
        *o = (
            (a.cos() * RING_RADIUS_CELLS).round() as i32,
            (a.sin() * RING_RADIUS_CELLS).round() as i32,
        );
    }
    out
}

/// Advance `src` by one step into `dst`. Both grids must share a shape.
pub fn step_grid(src: &FieldGrid, dst: &mut FieldGrid, params: &SimulationParams, input: &StepInput) {
    debug_assert_eq!(src.width, dst.width);
    debug_assert_eq!(src.height, dst.height);

    let w = src.width;
    let h = src.height;
    let ring = ring_offsets(input.time);
    let intensity = if input.intensity.is_finite() {
        input.intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let expand = params.expand_rate * intensity;
    let aspect = if input.aspect.is_finite() && input.aspect > 0.0 {
        input.aspect
    } else {
        1.0
    };
    let pointer = if input.pointer.is_finite() {
        Some(input.pointer)
    } else {
        None
    }
    .filter(|_| input.pointer_active);
    let brush = params.brush_radius.max(0.0);

    for y in 0..h {
        let yi = y as i32;
        for x in 0..w {
            let xi = x as i32;
            let cell = src.cells[src.idx(x, y)];

            // wave
            let laplacian = src.at_clamped(xi - 1, yi).height
                + src.at_clamped(xi + 1, yi).height
                + src.at_clamped(xi, yi - 1).height
                + src.at_clamped(xi, yi + 1).height
                - 4.0 * cell.height;
            let mut velocity = (cell.velocity + laplacian * params.wave_speed) * params.damping;
            let mut height = cell.height + velocity * SIM_DT;

            // directional diffusion
            let mut min_n = f32::MAX;
            let mut max_n = f32::MIN;
            for &(dx, dy) in &ring {
                let n = src.at_clamped(xi + dx, yi + dy).height;
                min_n = min_n.min(n);
                max_n = max_n.max(n);
            }
            if min_n < params.expand_threshold && min_n < height {
                height = lerp(height, min_n * EXPAND_TARGET_SCALE, expand);
            }
            height = lerp(height, max_n, params.fill_rate);

            if height > SETTLE_HEIGHT {
                velocity *= SETTLE_DECAY;
            }

            if let Some(p) = pointer {
                let uv = Vec2::new((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32);
                let d = (uv - p) * Vec2::new(aspect, 1.0);
                let s = 1.0 - smoothstep(brush * 0.6, brush, d.length());
                if s > 0.0 {
                    height = lerp(height, HEIGHT_MIN, s);
                    velocity = lerp(velocity, 0.0, s);
                }
            }

            let di = dst.idx(x, y);
            dst.cells[di] = FieldCell {
                height: clamp_finite(height, HEIGHT_MIN, HEIGHT_MAX),
                velocity: clamp_finite(velocity, -VELOCITY_LIMIT, VELOCITY_LIMIT),
            };
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep; a degenerate edge pair acts as a hard step.
#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    if e1 <= e0 {
        return if x < e0 { 0.0 } else { 1.0 };
    }
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp, mapping NaN/inf to the neutral value 0 first.
#[inline]
fn clamp_finite(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_finite() {
        v.clamp(lo, hi)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed_at(uv: Vec2) -> StepInput {
        StepInput {
            pointer: uv,
            pointer_active: true,
            intensity: 1.0,
            ..StepInput::default()
        }
    }

    #[test]
    fn pointer_pushes_cells_under_brush_to_floor() {
        let mut field = DisplacementField::new(64);
        let params = SimulationParams::default();
        field.step(&params, &pressed_at(Vec2::splat(0.5)));
        let centre = field.current().sample(Vec2::splat(0.5));
        assert_eq!(centre.height, HEIGHT_MIN);
        let corner = field.current().sample(Vec2::new(0.02, 0.02));
        assert_eq!(corner.height, 0.0);
    }

    #[test]
    fn inactive_pointer_leaves_flat_field_flat() {
        let mut field = DisplacementField::new(32);
        let params = SimulationParams::default();
        for _ in 0..10 {
            field.step(&params, &StepInput::default());
        }
        assert!(field.current().is_clear());
    }

    #[test]
    fn brush_is_round_on_wide_viewports() {
        let mut field = DisplacementField::new(128);
        let params = SimulationParams {
            brush_radius: 0.1,
            ..SimulationParams::default()
        };
        let input = StepInput {
            aspect: 2.0,
            ..pressed_at(Vec2::splat(0.5))
        };
        field.step(&params, &input);
        // 0.07 across is 0.14 in aspect-corrected units: outside the brush
        let across = field.current().sample(Vec2::new(0.57, 0.5));
        // 0.07 down stays inside
        let down = field.current().sample(Vec2::new(0.5, 0.57));
        assert_eq!(across.height, 0.0);
        assert!(down.height < -0.5);
    }

    #[test]
    fn released_field_heals_toward_surface() {
        let mut field = DisplacementField::new(32);
        let params = SimulationParams {
            fill_rate: 0.05,
            ..SimulationParams::default()
        };
        field.step(&params, &pressed_at(Vec2::splat(0.5)));
        let start = field.current().min_height();
        for _ in 0..400 {
            field.step(&params, &StepInput::default());
        }
        assert!(field.current().min_height() > start);
    }

    #[test]
    fn ring_rotates_with_time() {
        let a = ring_offsets(0.0);
        let b = ring_offsets(1.2);
        assert_ne!(a, b);
        for (dx, dy) in a {
            assert!(dx.abs() <= 2 && dy.abs() <= 2);
        }
    }

    #[test]
    fn ping_pong_split_is_disjoint() {
        let mut pp = PingPong::new(1, 2);
        {
            let (r, w) = pp.split();
            assert_eq!(*r, 1);
            *w = 3;
        }
        pp.advance(|r, w| *w = *r + 10);
        // advance wrote slot 1 (value 11) and made it current
        assert_eq!(*pp.current(), 11);
        assert_eq!(pp.current_index(), 1);
        assert_eq!(pp.steps(), 1);
    }

    fn uniform(height: f32, velocity: f32) -> FieldGrid {
        let mut g = FieldGrid::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                g.set(x, y, FieldCell { height, velocity });
            }
        }
        g
    }

    #[test]
    fn settled_cells_lose_velocity_faster() {
        let params = SimulationParams::default();
        let v = -0.01;
        let mut out = FieldGrid::new(8, 8);

        // near the surface: damping plus the settle decay
        step_grid(&uniform(0.0, v), &mut out, &params, &StepInput::default());
        let settled = out.at_clamped(4, 4).velocity;
        assert!((settled - v * params.damping * SETTLE_DECAY).abs() < 1e-7);

        // deep in a hole: damping only
        step_grid(&uniform(-0.5, v), &mut out, &params, &StepInput::default());
        let deep = out.at_clamped(4, 4).velocity;
        assert!((deep - v * params.damping).abs() < 1e-7);

        assert!(settled.abs() < deep.abs());
    }

    #[test]
    fn smoothstep_degenerate_edges() {
        assert_eq!(smoothstep(0.5, 0.5, 0.4), 0.0);
        assert_eq!(smoothstep(0.5, 0.5, 0.6), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }
}
