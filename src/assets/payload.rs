use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::AnimationClip;
use crate::errors::AssetError;
use crate::scene::geometry::MeshDesc;

/// One node of a loaded asset.
#[derive(Debug, Clone)]
pub struct AssetNode {
    pub name: String,
    /// Index of the parent within [`AssetPayload::nodes`]; must precede this node
    pub parent: Option<usize>,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh: Option<MeshDesc>,
}

impl AssetNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshDesc) -> Self {
        self.mesh = Some(mesh);
        self
    }
}

/// Everything a completed load delivers: a node hierarchy and its clips.
#[derive(Debug, Clone, Default)]
pub struct AssetPayload {
    pub nodes: Vec<AssetNode>,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl AssetPayload {
    /// Checks the node list is non-empty and topologically ordered.
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.nodes.is_empty() {
            return Err(AssetError::InvalidData("asset contains no nodes".into()));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent
                && parent >= index
            {
                return Err(AssetError::InvalidData(format!(
                    "node '{}' (#{index}) references parent #{parent} which does not precede it",
                    node.name
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn clip(&self, index: usize) -> Option<&Arc<AnimationClip>> {
        self.clips.get(index)
    }

    #[must_use]
    pub fn find_clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.iter().find(|c| c.name == name)
    }
}

/// Where asset payloads come from.
///
/// `fetch` runs on a loader worker thread and may block.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<AssetPayload, AssetError>;
}

/// Serves payloads registered ahead of time.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: FxHashMap<String, AssetPayload>,
}

impl MemoryAssetSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, payload: AssetPayload) {
        self.assets.insert(uri.into(), payload);
    }

    #[must_use]
    pub fn with_asset(mut self, uri: impl Into<String>, payload: AssetPayload) -> Self {
        self.insert(uri, payload);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, uri: &str) -> Result<AssetPayload, AssetError> {
        self.assets
            .get(uri)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(uri.to_string()))
    }
}
