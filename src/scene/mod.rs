//! Scene Graph
//!
//! Arena-backed node hierarchy and the descriptors the renderer consumes:
//! - [`Scene`]: node arena, render descriptors, background and fog
//! - [`Node`] / [`Transform`]: hierarchy and TRS with cached matrices
//! - [`Camera`]: perspective projection
//! - [`SceneAssembler`]: builds the static scene and attaches loaded assets

pub mod assembler;
pub mod camera;
pub mod geometry;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use assembler::{HelperNodes, SceneAssembler};
pub use camera::Camera;
pub use geometry::{Fog, GeometryDesc, HelperKind, MaterialDesc, MeshDesc, Renderable, Side};
pub use node::Node;
pub use scene::{Scene, SceneId};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a node inside a [`Scene`].
    pub struct NodeHandle;
}
