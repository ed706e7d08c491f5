//! Keyframe Animation
//!
//! Clips arrive with loaded assets; [`Binder`] resolves their tracks to scene
//! nodes and the resulting [`AnimationClipBinding`] is owned by the
//! [`AnimationPlayer`], which advances every binding once per tick.

mod values;
pub mod tracks;
pub mod clip;
pub mod binding;
pub mod binder;
pub mod player;

pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use player::{AnimationClipBinding, AnimationPlayer, BindingKey, LoopMode};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
