use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node beneath `root`.
    ///
    /// Tracks whose node is missing, whose data does not fit the target
    /// property, or whose keyframes are malformed are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let target = track.meta.target;
            if !track.data.fits(target) || !track.data.is_valid() {
                log::debug!("Skipping unusable track {} of clip '{}'", track_index, clip.name);
                continue;
            }

            match scene.find_node_by_name(root, &track.meta.node_name) {
                Some(node) => bindings.push(PropertyBinding {
                    track_index,
                    node,
                    target,
                }),
                None => log::debug!(
                    "Clip '{}' targets unknown node '{}'",
                    clip.name,
                    track.meta.node_name
                ),
            }
        }

        bindings
    }
}
