//! Runtime configuration for the simulation, the composition stages and the
//! idle/wash timing.
//!
//! Hosts hand the core a JSON object; every field is optional and falls back
//! to [`Config::default`]. After parsing, [`Config::sanitized`] clamps each
//! value into a range the simulation and shaders can digest, so a bad config
//! degrades the look instead of failing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::ColorPair;
use crate::constants::*;
use crate::error::Error;

/// Painterly kernel radius preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelRadius {
    Reduced,
    #[default]
    Full,
}

impl KernelRadius {
    /// Radius in output pixels.
    pub fn pixels(self) -> u32 {
        match self {
            KernelRadius::Reduced => KERNEL_RADIUS_REDUCED,
            KernelRadius::Full => KERNEL_RADIUS_FULL,
        }
    }
}

/// Device class the defaults are tuned for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Full,
    Constrained,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// When off the field is never stepped and the stages reveal around the
    /// pointer instead.
    pub enabled: bool,
    /// Cells per side of the displacement grid.
    pub resolution: u32,
    /// Brush radius in units of viewport height.
    pub brush_radius: f32,
    pub expand_rate: f32,
    pub fill_rate: f32,
    pub wave_speed: f32,
    pub damping: f32,
    /// Neighbour height below which a cell starts expanding toward it.
    pub expand_threshold: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            enabled: true,
            resolution: FIELD_RESOLUTION,
            brush_radius: 0.06,
            expand_rate: 0.12,
            fill_rate: 0.004,
            wave_speed: 0.12,
            damping: 0.95,
            expand_threshold: -0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub kernel_radius: KernelRadius,
    /// 3x3 gradient edge darkening in the enhancement stage.
    pub edge_detection: bool,
    pub edge_darkening: f32,
    /// Grain ("paper") strength.
    pub paper: f32,
    pub saturation: f32,
    pub vignette: f32,
    pub contrast: f32,
    pub reveal_threshold: f32,
    /// Reveal mask around the pointer when no simulation is running.
    pub fallback_reveal_radius: f32,
    pub fallback_reveal_softness: f32,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            kernel_radius: KernelRadius::Full,
            edge_detection: true,
            edge_darkening: 0.35,
            paper: 0.25,
            saturation: 1.15,
            vignette: 0.3,
            contrast: 1.08,
            reveal_threshold: REVEAL_THRESHOLD,
            fallback_reveal_radius: 0.12,
            fallback_reveal_softness: 0.08,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingParams {
    pub idle_timeout_sec: f32,
    pub wash_duration_sec: f32,
    pub color_transition_sec: f32,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            idle_timeout_sec: 15.0,
            wash_duration_sec: 5.0,
            color_transition_sec: COLOR_TRANSITION_SEC,
        }
    }
}

impl TimingParams {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.idle_timeout_sec)
    }

    pub fn wash_duration(&self) -> Duration {
        Duration::from_secs_f32(self.wash_duration_sec)
    }

    pub fn color_transition(&self) -> Duration {
        Duration::from_secs_f32(self.color_transition_sec)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,
    pub simulation: SimulationParams,
    pub pipeline: PipelineParams,
    pub timing: TimingParams,
    pub max_device_pixel_ratio: f64,
    /// Colours shown by the procedural fallback before any section is set.
    pub initial_colors: ColorPair,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::Full,
            simulation: SimulationParams::default(),
            pipeline: PipelineParams::default(),
            timing: TimingParams::default(),
            max_device_pixel_ratio: DEVICE_PIXEL_RATIO_CAP,
            initial_colors: ColorPair::default(),
        }
    }
}

impl Config {
    /// Defaults tuned for the given profile.
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
        .with_profile_overrides()
    }

    /// Parse a (possibly partial) JSON config and sanitize it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let parsed: Config = serde_json::from_str(json)?;
        Ok(parsed.with_profile_overrides().sanitized())
    }

    /// The constrained profile always gets the cheap kernel and no edge pass.
    fn with_profile_overrides(mut self) -> Self {
        if self.profile == Profile::Constrained {
            self.pipeline.kernel_radius = KernelRadius::Reduced;
            self.pipeline.edge_detection = false;
            self.simulation.resolution = self.simulation.resolution.min(FIELD_RESOLUTION / 2);
        }
        self
    }

    /// Clamp every tunable into a usable range. Non-finite values fall back to
    /// the defaults.
    pub fn sanitized(mut self) -> Self {
        let d = Config::default();
        let sim = &mut self.simulation;
        sim.resolution = sim
            .resolution
            .clamp(FIELD_RESOLUTION_MIN, FIELD_RESOLUTION_MAX);
        sim.brush_radius = finite_or(sim.brush_radius, d.simulation.brush_radius).clamp(0.0, 1.0);
        sim.expand_rate = finite_or(sim.expand_rate, d.simulation.expand_rate).clamp(0.0, 1.0);
        sim.fill_rate = finite_or(sim.fill_rate, d.simulation.fill_rate).clamp(0.0, 1.0);
        // explicit 2D wave integration is only stable up to 0.25
        sim.wave_speed = finite_or(sim.wave_speed, d.simulation.wave_speed).clamp(0.0, 0.25);
        sim.damping = finite_or(sim.damping, d.simulation.damping).clamp(0.0, 1.0);
        sim.expand_threshold =
            finite_or(sim.expand_threshold, d.simulation.expand_threshold).clamp(HEIGHT_MIN, HEIGHT_MAX);

        let p = &mut self.pipeline;
        p.edge_darkening = finite_or(p.edge_darkening, d.pipeline.edge_darkening).clamp(0.0, 1.0);
        p.paper = finite_or(p.paper, d.pipeline.paper).clamp(0.0, 1.0);
        p.saturation = finite_or(p.saturation, d.pipeline.saturation).clamp(0.0, 3.0);
        p.vignette = finite_or(p.vignette, d.pipeline.vignette).clamp(0.0, 1.0);
        p.contrast = finite_or(p.contrast, d.pipeline.contrast).clamp(0.0, 3.0);
        p.reveal_threshold =
            finite_or(p.reveal_threshold, d.pipeline.reveal_threshold).clamp(HEIGHT_MIN, HEIGHT_MAX);
        p.fallback_reveal_radius =
            finite_or(p.fallback_reveal_radius, d.pipeline.fallback_reveal_radius).clamp(0.0, 1.0);
        p.fallback_reveal_softness =
            finite_or(p.fallback_reveal_softness, d.pipeline.fallback_reveal_softness)
                .clamp(1e-3, 1.0);

        let t = &mut self.timing;
        t.idle_timeout_sec = finite_or(t.idle_timeout_sec, d.timing.idle_timeout_sec)
            .clamp(0.1, MAX_DURATION_SEC);
        t.wash_duration_sec = finite_or(t.wash_duration_sec, d.timing.wash_duration_sec)
            .clamp(0.1, MAX_DURATION_SEC);
        t.color_transition_sec = finite_or(t.color_transition_sec, d.timing.color_transition_sec)
            .clamp(0.0, MAX_DURATION_SEC);

        let dpr = if self.max_device_pixel_ratio.is_finite() {
            self.max_device_pixel_ratio
        } else {
            d.max_device_pixel_ratio
        };
        self.max_device_pixel_ratio = dpr.clamp(0.5, 4.0);
        self.initial_colors = self.initial_colors.clamped();
        self
    }
}

#[inline]
fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg, Config::default().sanitized());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg = Config::from_json(
            r#"{ "simulation": { "brush_radius": 0.1 }, "timing": { "idle_timeout_sec": 3 } }"#,
        )
        .unwrap();
        assert!((cfg.simulation.brush_radius - 0.1).abs() < 1e-6);
        assert_eq!(cfg.timing.idle_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.simulation.damping, SimulationParams::default().damping);
    }

    #[test]
    fn kernel_radius_parses_lowercase() {
        let cfg = Config::from_json(r#"{ "pipeline": { "kernel_radius": "reduced" } }"#).unwrap();
        assert_eq!(cfg.pipeline.kernel_radius, KernelRadius::Reduced);
        assert_eq!(cfg.pipeline.kernel_radius.pixels(), KERNEL_RADIUS_REDUCED);
    }

    #[test]
    fn constrained_profile_forces_cheap_pipeline() {
        let cfg = Config::from_json(
            r#"{ "profile": "constrained", "pipeline": { "kernel_radius": "full", "edge_detection": true } }"#,
        )
        .unwrap();
        assert_eq!(cfg.pipeline.kernel_radius, KernelRadius::Reduced);
        assert!(!cfg.pipeline.edge_detection);
        assert!(cfg.simulation.resolution <= FIELD_RESOLUTION / 2);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut cfg = Config::default();
        cfg.simulation.wave_speed = 4.0;
        cfg.simulation.damping = -1.0;
        cfg.simulation.resolution = 4;
        cfg.pipeline.saturation = f32::NAN;
        cfg.max_device_pixel_ratio = 10.0;
        let cfg = cfg.sanitized();
        assert_eq!(cfg.simulation.wave_speed, 0.25);
        assert_eq!(cfg.simulation.damping, 0.0);
        assert_eq!(cfg.simulation.resolution, FIELD_RESOLUTION_MIN);
        assert_eq!(cfg.pipeline.saturation, PipelineParams::default().saturation);
        assert_eq!(cfg.max_device_pixel_ratio, 4.0);
    }

    #[test]
    fn huge_durations_are_capped() {
        let cfg = Config::from_json(
            r#"{ "timing": { "idle_timeout_sec": 1e30, "wash_duration_sec": 1e38, "color_transition_sec": 1e20 } }"#,
        )
        .unwrap();
        let cap = Duration::from_secs_f32(MAX_DURATION_SEC);
        assert_eq!(cfg.timing.idle_timeout(), cap);
        assert_eq!(cfg.timing.wash_duration(), cap);
        assert_eq!(cfg.timing.color_transition(), cap);
    }

    #[test]
    fn simulation_can_be_switched_off() {
        let cfg = Config::from_json(r#"{ "simulation": { "enabled": false } }"#).unwrap();
        assert!(!cfg.simulation.enabled);
        assert!(Config::default().simulation.enabled);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(Config::from_json("{ nope"), Err(Error::Config(_))));
    }
}
