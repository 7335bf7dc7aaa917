pub mod clock;
pub mod color;
pub mod compose;
pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod frame;
pub mod grain;
pub mod idle;
pub mod images;
pub mod noise;
pub mod orchestrator;
pub mod pointer;
pub mod viewport;

pub static SOURCE_WGSL: &str = include_str!("../shaders/source.wgsl");
pub static PAINTERLY_WGSL: &str = include_str!("../shaders/painterly.wgsl");
pub static ENHANCE_WGSL: &str = include_str!("../shaders/enhance.wgsl");

pub use color::{ColorInterpolator, ColorPair};
pub use config::{Config, KernelRadius, PipelineParams, Profile, SimulationParams, TimingParams};
pub use constants::*;
pub use error::Error;
pub use field::{DisplacementField, FieldCell, FieldGrid, PingPong, StepInput};
pub use frame::FrameParams;
pub use idle::{ActivityState, IdleEvent, IdleMachine};
pub use images::{ImageSet, SourceImage};
pub use orchestrator::Orchestrator;
pub use pointer::PointerSmoother;
pub use viewport::Viewport;
