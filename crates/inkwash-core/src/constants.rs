// Shared simulation/shading tuning constants used by the core and the web frontend.

// Displacement field
pub const FIELD_RESOLUTION: u32 = 256; // default cells per side
pub const FIELD_RESOLUTION_MIN: u32 = 32;
pub const FIELD_RESOLUTION_MAX: u32 = 1024;
pub const HEIGHT_MIN: f32 = -1.0; // fully revealed
pub const HEIGHT_MAX: f32 = 0.0; // untouched surface
pub const VELOCITY_LIMIT: f32 = 0.2; // symmetric clamp on cell velocity
pub const EXPAND_TARGET_SCALE: f32 = 0.92; // expansion blends toward min neighbour * this
pub const SETTLE_HEIGHT: f32 = -0.02; // above this, velocity decays faster
pub const SETTLE_DECAY: f32 = 0.9; // extra velocity factor once settled
pub const RING_SAMPLES: usize = 8;
pub const RING_RADIUS_CELLS: f32 = 1.5; // diffusion ring radius
pub const RING_ROTATION_SPEED: f32 = 0.35; // radians per second
pub const SIM_DT: f32 = 1.0; // integration step per frame (frame-locked)

// Pointer smoothing
pub const POINTER_SMOOTHING: f32 = 0.1; // exponential factor toward the raw target
pub const INTENSITY_ATTACK: f32 = 0.3; // fast rise
pub const INTENSITY_RELEASE: f32 = 0.05; // slow decay
pub const INTENSITY_GAIN: f32 = 60.0; // maps per-frame uv delta to 0..1 intensity

// Section colour transitions
pub const COLOR_TRANSITION_SEC: f32 = 2.0;

// Wash boundary
pub const WASH_FEATHER: f32 = 0.15;
pub const WASH_SWEEP_START: f32 = -0.6; // boundary fully before the rotated square
pub const WASH_SWEEP_END: f32 = 1.6; // boundary fully past it
pub const WASH_NOISE_AMPLITUDE: f32 = 0.12;
pub const WASH_NOISE_OCTAVES: usize = 3;

// Cover transform
pub const COVER_MIN_SCALE: f32 = 0.35; // floor on visible fraction of the cropped axis

// Procedural fallback
pub const PROCEDURAL_CELLS: f32 = 5.0; // seeds per side

// Painterly filter
pub const KERNEL_RADIUS_REDUCED: u32 = 3;
pub const KERNEL_RADIUS_FULL: u32 = 6;
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
pub const REVEAL_THRESHOLD: f32 = -0.25; // field height below which the source shows through
pub const REFRACTION_STRENGTH: f32 = 0.015; // uv offset per unit gradient
pub const EDGE_SHADOW_STRENGTH: f32 = 0.35;
pub const EDGE_SHADOW_BAND: f32 = 0.12; // height distance from the threshold that still shades
pub const GRADIENT_GAIN: f32 = 4.0; // gradient magnitude mapped to 0..1 shadow weight

// Enhancement
pub const REVEAL_SOFTNESS: f32 = 0.1; // half-width of the smooth reveal ramp
pub const GRAIN_MIX: f32 = 0.5; // grain is applied at this fraction of `paper`
pub const VIGNETTE_INNER: f32 = 0.45;
pub const VIGNETTE_OUTER: f32 = 1.0;

// Viewport
pub const DEVICE_PIXEL_RATIO_CAP: f64 = 2.0;

// Grain
pub const GRAIN_TEXTURE_SIZE: u32 = 256;
pub const GRAIN_SEED: u64 = 0x1A2B_3C4D;

// Idle timing
pub const IDLE_POLL_MS: i32 = 500; // cadence of the poll that runs without frames
pub const MAX_DURATION_SEC: f32 = 3600.0; // ceiling for every configured duration
