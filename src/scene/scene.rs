use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use slotmap::{SecondaryMap, SlotMap};

use crate::scene::NodeHandle;
use crate::scene::geometry::{Fog, Renderable};
use crate::scene::node::Node;
use crate::scene::transform_system;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of one scene lifetime.
///
/// A fresh id is issued on creation and again on [`Scene::clear`], so work
/// started against a torn-down scene can be recognised and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u32);

impl SceneId {
    fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Scene graph arena.
///
/// Nodes are owned by the arena and addressed through stable [`NodeHandle`]s.
/// Removing a node invalidates its handle; stale handles simply resolve to
/// `None`.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,

    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
    renderables: SecondaryMap<NodeHandle, Renderable>,

    pub background: Vec3,
    pub fog: Option<Fog>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SceneId::next(),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            renderables: SecondaryMap::new(),
            background: Vec3::ZERO,
            fog: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    // ========================================================================
    // Node management
    // ========================================================================

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Creates an empty named node at the root level.
    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    /// Adds a node as a child of `parent`.
    ///
    /// Falls back to the root level when `parent` no longer exists.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("Parent node is gone; adding child at the root level");
            return self.add_node(child);
        }

        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Re-parents `child` under `parent`, detaching it from its previous parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach a node beneath its own descendant");
            return;
        }

        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
        self.root_nodes.retain(|&h| h != child);
    }

    fn detach(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        match old_parent {
            Some(old) => {
                if let Some(p) = self.nodes.get_mut(old) {
                    p.children.retain(|&h| h != child);
                }
            }
            None => self.root_nodes.retain(|&h| h != child),
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach(handle);

        for h in self.collect_subtree(handle) {
            self.nodes.remove(h);
            self.renderables.remove(h);
        }
    }

    /// Returns `root` and all of its descendants in depth-first order.
    #[must_use]
    pub fn collect_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Finds the first node named `name` in the subtree rooted at `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.collect_subtree(root)
            .into_iter()
            .find(|&h| self.nodes.get(h).is_some_and(|n| n.name == name))
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    // ========================================================================
    // Render descriptors
    // ========================================================================

    pub fn set_renderable(&mut self, handle: NodeHandle, renderable: Renderable) {
        if !self.nodes.contains_key(handle) {
            log::warn!("Renderable assigned to a node that no longer exists");
            return;
        }
        self.renderables.insert(handle, renderable);
    }

    #[must_use]
    pub fn renderable(&self, handle: NodeHandle) -> Option<&Renderable> {
        self.renderables.get(handle)
    }

    pub fn renderable_mut(&mut self, handle: NodeHandle) -> Option<&mut Renderable> {
        self.renderables.get_mut(handle)
    }

    /// Visible nodes with a render descriptor.
    pub fn renderables(&self) -> impl Iterator<Item = (NodeHandle, &Node, &Renderable)> {
        self.renderables.iter().filter_map(move |(handle, renderable)| {
            let node = self.nodes.get(handle)?;
            node.visible.then_some((handle, node, renderable))
        })
    }

    // ========================================================================
    // Per-frame update & lifecycle
    // ========================================================================

    /// Propagates local transforms into world matrices.
    pub fn update_world_matrices(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }

    /// Drops every node and starts a new scene lifetime.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root_nodes.clear();
        self.renderables.clear();
        self.fog = None;
        self.id = SceneId::next();
    }
}
