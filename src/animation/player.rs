use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::animation::binding::{PropertyBinding, TargetPath};
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    /// Handle of one clip binding inside an [`AnimationPlayer`].
    pub struct BindingKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Play to the end and hold the last pose.
    Once,
    /// Wrap back to the start.
    #[default]
    Loop,
    /// Bounce between start and end.
    PingPong,
}

/// A clip playing on one loaded asset.
///
/// `local_time` always stays inside `[0, duration]`, and strictly below
/// `duration` for [`LoopMode::Loop`].
#[derive(Debug, Clone)]
pub struct AnimationClipBinding {
    /// Root node of the asset the clip drives
    pub target: NodeHandle,
    clip: Arc<AnimationClip>,

    pub local_time: f32,
    pub playback_rate: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,

    properties: Vec<PropertyBinding>,
    cursors: Vec<KeyframeCursor>,
    reversed: bool,
}

impl AnimationClipBinding {
    #[must_use]
    pub fn new(target: NodeHandle, clip: Arc<AnimationClip>, properties: Vec<PropertyBinding>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            target,
            clip,
            local_time: 0.0,
            playback_rate: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            properties,
            cursors: vec![KeyframeCursor::default(); track_count],
            reversed: false,
        }
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Scales the playback rate so one pass of the clip lasts `seconds`.
    ///
    /// Non-positive or non-finite durations leave the rate untouched.
    #[must_use]
    pub fn with_duration(mut self, seconds: f32) -> Self {
        if seconds.is_finite() && seconds > 0.0 && self.clip.duration > 0.0 {
            self.playback_rate = self.clip.duration / seconds;
        }
        self
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyBinding] {
        &self.properties
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.loop_mode != LoopMode::Once
    }

    /// Advances the playhead by `delta` seconds scaled by the playback rate.
    pub fn advance(&mut self, delta: f32) {
        if self.paused {
            return;
        }

        let duration = self.clip.duration;
        let step = delta * self.playback_rate;
        if duration <= 0.0 || step == 0.0 || !step.is_finite() {
            return;
        }

        match self.loop_mode {
            LoopMode::Once => {
                let time = self.local_time + step;
                if time >= duration {
                    self.local_time = duration;
                    self.paused = true;
                } else if time < 0.0 {
                    self.local_time = 0.0;
                    self.paused = true;
                } else {
                    self.local_time = time;
                }
            }
            LoopMode::Loop => {
                let wrapped = (self.local_time + step).rem_euclid(duration);
                self.local_time = if wrapped >= duration { 0.0 } else { wrapped };
            }
            LoopMode::PingPong => {
                let period = duration * 2.0;
                let phase = if self.reversed {
                    period - self.local_time
                } else {
                    self.local_time
                };
                let phase = (phase + step).rem_euclid(period);
                if phase > duration {
                    self.local_time = period - phase;
                    self.reversed = true;
                } else {
                    self.local_time = phase;
                    self.reversed = false;
                }
            }
        }
    }

    /// Writes the pose at `local_time` into the bound nodes.
    fn apply(&mut self, scene: &mut Scene) {
        let time = self.local_time;
        for property in &self.properties {
            let (Some(track), Some(cursor)) = (
                self.clip.tracks.get(property.track_index),
                self.cursors.get_mut(property.track_index),
            ) else {
                continue;
            };
            let Some(node) = scene.get_node_mut(property.node) else {
                continue;
            };

            match (&track.data, property.target) {
                (TrackData::Vector3(t), TargetPath::Translation) => {
                    if let Some(value) = t.sample_with_cursor(time, cursor) {
                        node.transform.position = value;
                    }
                }
                (TrackData::Vector3(t), TargetPath::Scale) => {
                    if let Some(value) = t.sample_with_cursor(time, cursor) {
                        node.transform.scale = value;
                    }
                }
                (TrackData::Quaternion(t), TargetPath::Rotation) => {
                    if let Some(value) = t.sample_with_cursor(time, cursor) {
                        node.transform.rotation = value;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Owns every clip binding and advances them once per tick.
///
/// Bindings are independent: the order in which they are updated does not
/// affect the resulting poses.
#[derive(Debug, Default)]
pub struct AnimationPlayer {
    bindings: SlotMap<BindingKey, AnimationClipBinding>,
}

impl AnimationPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, binding: AnimationClipBinding) -> BindingKey {
        self.bindings.insert(binding)
    }

    pub fn remove(&mut self, key: BindingKey) -> Option<AnimationClipBinding> {
        self.bindings.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: BindingKey) -> Option<&AnimationClipBinding> {
        self.bindings.get(key)
    }

    pub fn get_mut(&mut self, key: BindingKey) -> Option<&mut AnimationClipBinding> {
        self.bindings.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingKey, &AnimationClipBinding)> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drops every binding. Used on scene teardown.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Advances all bindings by `delta` and applies their poses to `scene`.
    ///
    /// Bindings whose target node no longer exists are skipped. Returns the
    /// number of bindings whose pose was applied.
    pub fn update(&mut self, delta: f32, scene: &mut Scene) -> usize {
        let mut applied = 0;
        for (_key, binding) in &mut self.bindings {
            if !scene.contains(binding.target) || binding.paused {
                continue;
            }
            binding.advance(delta);
            binding.apply(scene);
            applied += 1;
        }
        if applied > 0 {
            log::trace!("Animated {applied} clip bindings by {delta:.4}s");
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::clip::{Track, TrackMeta};
    use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
    use glam::Vec3;

    fn binding(duration: f32, mode: LoopMode) -> AnimationClipBinding {
        let track = Track {
            meta: TrackMeta {
                node_name: "bone".into(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, duration],
                vec![Vec3::ZERO, Vec3::X],
                InterpolationMode::Linear,
            )),
        };
        let clip = Arc::new(AnimationClip::new("walk", vec![track]));
        AnimationClipBinding::new(NodeHandle::default(), clip, Vec::new()).with_loop_mode(mode)
    }

    #[test]
    fn ping_pong_reflects_at_the_ends() {
        let mut b = binding(1.0, LoopMode::PingPong);
        b.advance(0.75);
        assert!((b.local_time - 0.75).abs() < 1e-6);
        b.advance(0.5);
        assert!((b.local_time - 0.75).abs() < 1e-6);
        b.advance(0.5);
        assert!((b.local_time - 0.25).abs() < 1e-6);
        b.advance(0.5);
        assert!((b.local_time - 0.25).abs() < 1e-6);
    }

    #[test]
    fn zero_step_keeps_a_reversed_ping_pong_playhead() {
        let mut b = binding(0.7, LoopMode::PingPong);
        b.advance(0.9);
        assert!(b.reversed);
        let before = b.local_time;
        b.advance(0.0);
        assert_eq!(b.local_time.to_bits(), before.to_bits());
        assert!(b.reversed);
    }

    #[test]
    fn once_stops_at_the_end() {
        let mut b = binding(2.0, LoopMode::Once);
        b.advance(5.0);
        assert_eq!(b.local_time, 2.0);
        assert!(b.paused);
    }

    #[test]
    fn retiming_scales_the_rate() {
        let b = binding(2.5, LoopMode::Loop).with_duration(1.0);
        assert!((b.playback_rate - 2.5).abs() < 1e-6);
        let untouched = binding(2.5, LoopMode::Loop).with_duration(0.0);
        assert_eq!(untouched.playback_rate, 1.0);
    }
}
