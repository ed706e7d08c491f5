use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::geometry::{GeometryDesc, MaterialDesc, MeshDesc, Side};
use crate::sky::sun::{AtmosphereParams, SunSample};

/// Uniforms for the static gradient sky dome.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GradientSkyUniforms {
    pub top_color: Vec3,
    /// Vertical offset applied to the view height before blending
    pub offset: f32,
    pub bottom_color: Vec3,
    /// Blend curve exponent
    pub exponent: f32,
}

/// Gradient sky dome: a large back-faced sphere shaded top→bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientSky {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub uniforms: GradientSkyUniforms,
}

/// Physically-inspired atmospheric sky drawn on a huge back-faced cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericSky {
    /// Uniform scale applied to the unit sky cube
    pub scale: f32,
}

/// Selects which sky strategy a scene is assembled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyStrategy {
    Gradient,
    #[default]
    Atmospheric,
}

/// Per-frame sky shader inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkyUniforms {
    Gradient(GradientSkyUniforms),
    Atmosphere(AtmosphereParams),
}

/// The two interchangeable sky strategies.
///
/// Both consume the same [`SunSample`]; the gradient dome ignores it and
/// stays static, the atmospheric sky tracks it every frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SkyModel {
    Gradient(GradientSky),
    Atmospheric(AtmosphericSky),
}

impl SkyModel {
    #[must_use]
    pub fn strategy(&self) -> SkyStrategy {
        match self {
            Self::Gradient(_) => SkyStrategy::Gradient,
            Self::Atmospheric(_) => SkyStrategy::Atmospheric,
        }
    }

    /// Whether the sky appearance depends on the sun.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Atmospheric(_))
    }

    #[must_use]
    pub fn uniforms(&self, sun: &SunSample) -> SkyUniforms {
        match self {
            Self::Gradient(sky) => SkyUniforms::Gradient(sky.uniforms),
            Self::Atmospheric(_) => SkyUniforms::Atmosphere(sun.atmosphere),
        }
    }

    /// Mesh descriptor and uniform node scale for the sky node.
    #[must_use]
    pub fn mesh(&self, sun: &SunSample) -> (MeshDesc, f32) {
        match self {
            Self::Gradient(sky) => (
                MeshDesc::new(
                    GeometryDesc::Sphere {
                        radius: sky.radius,
                        width_segments: sky.width_segments,
                        height_segments: sky.height_segments,
                    },
                    MaterialDesc::SkyGradient(sky.uniforms),
                )
                .with_side(Side::Back),
                1.0,
            ),
            Self::Atmospheric(sky) => (
                MeshDesc::new(
                    GeometryDesc::Cube { size: 1.0 },
                    MaterialDesc::Atmosphere(sun.atmosphere),
                )
                .with_side(Side::Back),
                sky.scale,
            ),
        }
    }
}
