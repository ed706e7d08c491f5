use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

#[derive(Debug, Clone)]
pub struct TrackMeta {
    /// Name of the node the track drives, looked up beneath the asset root
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            Self::Vector3(track) => track.end_time(),
            Self::Quaternion(track) => track.end_time(),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Vector3(track) => track.is_valid(),
            Self::Quaternion(track) => track.is_valid(),
        }
    }

    /// Whether this data can drive `target`.
    #[must_use]
    pub fn fits(&self, target: TargetPath) -> bool {
        matches!(
            (self, target),
            (Self::Vector3(_), TargetPath::Translation | TargetPath::Scale) | (Self::Quaternion(_), TargetPath::Rotation)
        )
    }
}

/// Track metadata plus its keyframes.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

/// A named set of tracks. The duration is the latest key time of any track.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .filter(|d| d.is_finite())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }
}
