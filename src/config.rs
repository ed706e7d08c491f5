//! Viewer Configuration
//!
//! Static initial parameters for one viewer run. Every section implements
//! `Default` with the stock scene's constants, and JSON documents only need
//! to mention the fields they override.
//!
//! ```rust,ignore
//! use skydome::config::ViewerConfig;
//!
//! let config = ViewerConfig::from_json_str(r#"{ "sky": { "strategy": "gradient" } }"#)?;
//! ```

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::LoopMode;
use crate::errors::Result;
use crate::render::RenderSettings;
use crate::sky::{SkyStrategy, TimeOfDayState};

/// Complete configuration of the viewer core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub time_of_day: TimeOfDayState,
    pub day_cycle: DayCycleConfig,
    pub sky: SkyConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub lighting: LightingConfig,
    pub ground: GroundConfig,
    pub environment: EnvironmentConfig,
    pub render: RenderSettings,
    pub viewport: ViewportSize,
    pub characters: Vec<CharacterConfig>,
}

impl ViewerConfig {
    /// The stock scene: defaults plus the animated flamingo.
    #[must_use]
    pub fn stock() -> Self {
        Self {
            characters: vec![CharacterConfig::default()],
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded viewer config from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Forces every value into a renderable range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.time_of_day = self.time_of_day.sanitized();

        if !self.day_cycle.azimuth_step.is_finite() {
            self.day_cycle.azimuth_step = DayCycleConfig::default().azimuth_step;
        }

        let cam = &mut self.camera;
        cam.fov_degrees = finite_or(cam.fov_degrees, 120.0).clamp(1.0, 179.0);
        cam.near = finite_or(cam.near, 1.0).max(1e-4);
        cam.far = finite_or(cam.far, 10_000.0).max(cam.near * 2.0);

        let orbit = &mut self.orbit;
        orbit.min_distance = finite_or(orbit.min_distance, 0.0).max(0.0);
        orbit.max_distance = finite_or(orbit.max_distance, 5000.0).max(orbit.min_distance);
        orbit.min_polar_angle = finite_or(orbit.min_polar_angle, 0.0).clamp(0.0, std::f32::consts::PI);
        orbit.max_polar_angle =
            finite_or(orbit.max_polar_angle, FRAC_PI_2).clamp(orbit.min_polar_angle, std::f32::consts::PI);
        orbit.damping_factor = finite_or(orbit.damping_factor, 0.05).clamp(0.0, 1.0);

        let shadow = &mut self.lighting.directional.shadow;
        shadow.half_extent = finite_or(shadow.half_extent, 50.0).max(1e-3);
        shadow.near = finite_or(shadow.near, 0.5).max(0.0);
        shadow.far = finite_or(shadow.far, 3500.0).max(shadow.near + 1e-3);
        shadow.map_size = shadow.map_size.max(1);

        self.lighting.directional.distance = finite_or(self.lighting.directional.distance, 500.0).max(1e-3);

        self.render.pixel_ratio = finite_or(self.render.pixel_ratio, 1.0).max(0.1);

        for character in &mut self.characters {
            character.clip_duration = character
                .clip_duration
                .filter(|d| d.is_finite() && *d > 0.0);
        }

        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Autonomous day/night cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCycleConfig {
    pub auto_advance: bool,
    /// Azimuth increment applied once per tick
    pub azimuth_step: f32,
}

impl Default for DayCycleConfig {
    fn default() -> Self {
        Self {
            auto_advance: true,
            azimuth_step: 0.0001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkyConfig {
    pub strategy: SkyStrategy,
    pub gradient: GradientSkyConfig,
    pub atmospheric: AtmosphericSkyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientSkyConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Zenith color; follows the hemisphere sky color when unset
    pub top_color: Option<[f32; 3]>,
    /// Horizon color; fog uses the same color
    pub bottom_color: [f32; 3],
    pub offset: f32,
    pub exponent: f32,
}

impl Default for GradientSkyConfig {
    fn default() -> Self {
        Self {
            radius: 4000.0,
            width_segments: 32,
            height_segments: 15,
            top_color: None,
            bottom_color: [1.0, 1.0, 1.0],
            offset: 33.0,
            exponent: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphericSkyConfig {
    pub scale: f32,
}

impl Default for AtmosphericSkyConfig {
    fn default() -> Self {
        Self { scale: 450_000.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// Orbit pivot
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 120.0,
            near: 1.0,
            far: 10_000.0,
            position: [0.0, 0.0, 250.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle bounds in radians, measured from +Y
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: 5000.0,
            min_polar_angle: 0.0,
            max_polar_angle: FRAC_PI_2,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LightingConfig {
    pub hemisphere: HemisphereConfig,
    pub directional: DirectionalConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisphereConfig {
    /// `[h, s, l]`
    pub sky_hsl: [f32; 3],
    /// `[h, s, l]`
    pub ground_hsl: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for HemisphereConfig {
    fn default() -> Self {
        Self {
            sky_hsl: [0.6, 1.0, 0.6],
            ground_hsl: [0.095, 1.0, 0.75],
            intensity: 0.6,
            position: [0.0, 50.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalConfig {
    /// `[h, s, l]`
    pub color_hsl: [f32; 3],
    pub intensity: f32,
    /// Position before the first sun sync
    pub initial_position: [f32; 3],
    /// Distance from the origin at which the light sits along the sun vector
    pub distance: f32,
    pub cast_shadows: bool,
    pub shadow: ShadowConfig,
}

impl Default for DirectionalConfig {
    fn default() -> Self {
        Self {
            color_hsl: [0.1, 1.0, 0.95],
            intensity: 1.0,
            initial_position: [-30.0, 52.5, 0.0],
            distance: 500.0,
            cast_shadows: true,
            shadow: ShadowConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub map_size: u32,
    /// Half-extent `d` of the orthographic shadow frustum
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    pub bias: f32,
    pub normal_bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 2048,
            half_extent: 50.0,
            near: 0.5,
            far: 3500.0,
            bias: -0.0001,
            normal_bias: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub size: f32,
    pub elevation: f32,
    /// `[h, s, l]`
    pub color_hsl: [f32; 3],
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 10_000.0,
            elevation: -33.0,
            color_hsl: [0.095, 1.0, 0.75],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// `[h, s, l]`
    pub background_hsl: [f32; 3],
    pub fog_near: f32,
    pub fog_far: f32,
    pub show_helpers: bool,
    pub axes_size: f32,
    pub light_helper_size: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            background_hsl: [0.1, 0.0, 1.0],
            fog_near: 1.0,
            fog_far: 5000.0,
            show_helpers: true,
            axes_size: 50.0,
            light_helper_size: 10.0,
        }
    }
}

/// Logical viewport size at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Placement and playback of one animated character asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub uri: String,
    pub scale: f32,
    pub position: [f32; 3],
    /// Yaw in radians
    pub rotation_y: f32,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Which clip of the asset to play
    pub clip_index: usize,
    /// Retimes the clip to last this many seconds; native speed when unset
    pub clip_duration: Option<f32>,
    pub loop_mode: LoopMode,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            uri: "models/gltf/Flamingo.glb".to_string(),
            scale: 0.35,
            position: [0.0, 50.0, 0.0],
            rotation_y: -1.0,
            cast_shadow: true,
            receive_shadow: true,
            clip_index: 0,
            clip_duration: Some(1.0),
            loop_mode: LoopMode::Loop,
        }
    }
}

impl CharacterConfig {
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json_str(r#"{ "sky": { "strategy": "gradient" } }"#).unwrap();
        assert_eq!(config.sky.strategy, SkyStrategy::Gradient);
        assert_eq!(config.camera, CameraConfig::default());
        assert!(config.characters.is_empty());
    }

    #[test]
    fn sanitize_repairs_bounds() {
        let config = ViewerConfig::from_json_str(
            r#"{
                "orbit": { "min_distance": -5, "max_distance": -10, "max_polar_angle": 9 },
                "time_of_day": { "azimuth": 1.5, "exposure": 4 },
                "characters": [{ "clip_duration": 0 }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.orbit.min_distance, 0.0);
        assert_eq!(config.orbit.max_distance, 0.0);
        assert_eq!(config.orbit.max_polar_angle, std::f32::consts::PI);
        assert!((config.time_of_day.azimuth - 0.5).abs() < 1e-6);
        assert_eq!(config.time_of_day.exposure, 1.0);
        assert_eq!(config.characters[0].clip_duration, None);
    }

    #[test]
    fn round_trips_through_json() {
        let config = ViewerConfig::stock();
        let json = config.to_json_string().unwrap();
        let parsed = ViewerConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.characters, config.characters);
        assert_eq!(parsed.camera, config.camera);
        assert_eq!(parsed.sky.strategy, config.sky.strategy);
    }
}
