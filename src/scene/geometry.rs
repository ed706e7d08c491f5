//! Render Descriptors
//!
//! Plain data describing what a node draws. The core never builds vertex
//! buffers or shaders; the renderer backend turns these descriptors into GPU
//! resources however it likes.

use glam::Vec3;

use crate::sky::{AtmosphereParams, GradientSkyUniforms};

/// Primitive geometry description.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDesc {
    /// XY plane centred on the origin.
    Plane { width: f32, height: f32 },
    /// UV sphere.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Axis-aligned cube with the given edge length.
    Cube { size: f32 },
    /// Mesh primitive owned by a loaded asset, referenced by name.
    Asset { uri: String, mesh: String },
}

/// Which faces a material renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Material description.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialDesc {
    /// Diffuse-only lit material.
    Lambert { color: Vec3 },
    /// Unlit flat color.
    Basic { color: Vec3 },
    /// Static vertical gradient sky dome.
    SkyGradient(GradientSkyUniforms),
    /// Dynamic atmospheric scattering sky; uniforms are refreshed per frame.
    Atmosphere(AtmosphereParams),
    /// Material provided by a loaded asset.
    Asset,
}

/// Debug line visualisations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HelperKind {
    /// RGB axis lines of the given length.
    Axes { size: f32 },
    /// Hemisphere light octahedron.
    HemisphereLight { size: f32 },
    /// Directional light plane and aim line.
    DirectionalLight { size: f32 },
}

/// Everything the renderer needs to draw one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    Mesh(MeshDesc),
    Helper(HelperKind),
}

/// A geometry/material pair with shadow flags.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDesc {
    pub geometry: GeometryDesc,
    pub material: MaterialDesc,
    pub side: Side,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshDesc {
    #[must_use]
    pub fn new(geometry: GeometryDesc, material: MaterialDesc) -> Self {
        Self {
            geometry,
            material,
            side: Side::Front,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Vec3,
    pub near: f32,
    pub far: f32,
}
