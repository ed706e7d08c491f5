use serde::{Deserialize, Serialize};

use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

/// How far the cursor scans linearly before falling back to a binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Last keyframe index a track was sampled at.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// One value per key, or `[in_tangent, value, out_tangent]` triples for
    /// [`InterpolationMode::CubicSpline`]
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Whether key times are sorted and the value count matches the mode.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let per_key = match self.interpolation {
            InterpolationMode::CubicSpline => 3,
            InterpolationMode::Linear | InterpolationMode::Step => 1,
        };
        !self.times.is_empty()
            && self.values.len() == self.times.len() * per_key
            && self.times.iter().all(|t| t.is_finite())
            && self.times.windows(2).all(|w| w[0] <= w[1])
    }

    /// Time of the last key, or zero for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples without a cursor. `None` when the track is empty.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.times.is_empty() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        self.sample_at_frame(next_idx.saturating_sub(1), time)
    }

    /// Samples using `cursor` as a hint for where the last lookup landed.
    ///
    /// Playback usually moves forward by a key or two per frame, so a short
    /// linear scan around the cursor is tried before the binary search.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        if len == 0 {
            return None;
        }
        if len == 1 {
            return self.value_at(0);
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found = if time >= t_curr {
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    res = Some(len - 1);
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            (0..=MAX_SCAN_OFFSET.min(i))
                .map(|offset| i - offset)
                .find(|&idx| time >= self.times[idx])
        };

        let index = found.unwrap_or_else(|| self.times.partition_point(|&t| t <= time).saturating_sub(1));
        cursor.last_index = index;

        self.sample_at_frame(index, time)
    }

    fn value_at(&self, index: usize) -> Option<T> {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values.get(index * 3 + 1).copied(),
            InterpolationMode::Linear | InterpolationMode::Step => self.values.get(index).copied(),
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> Option<T> {
        let len = self.times.len();
        if index >= len - 1 {
            return self.value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => {
                let v0 = self.value_at(index)?;
                let v1 = self.value_at(next_idx)?;
                Some(T::interpolate_linear(v0, v1, t))
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                let v0 = *self.values.get(i_prev + 1)?;
                let out_tangent0 = *self.values.get(i_prev + 2)?;
                let in_tangent1 = *self.values.get(i_next)?;
                let v1 = *self.values.get(i_next + 1)?;

                Some(T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> KeyframeTrack<f32> {
        KeyframeTrack::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 10.0, 20.0, 30.0], InterpolationMode::Linear)
    }

    #[test]
    fn cursor_and_binary_search_agree() {
        let track = ramp();
        let mut cursor = KeyframeCursor::default();
        for &time in &[0.0, 0.5, 1.5, 2.9, 0.2, 3.5, -1.0, 2.0] {
            let a = track.sample_with_cursor(time, &mut cursor).unwrap();
            let b = track.sample(time).unwrap();
            assert!((a - b).abs() < 1e-5, "time {time}: {a} vs {b}");
        }
    }

    #[test]
    fn step_holds_previous_key() {
        let track = KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32, 2.0], InterpolationMode::Step);
        assert_eq!(track.sample(0.99), Some(1.0));
        assert_eq!(track.sample(1.0), Some(2.0));
    }

    #[test]
    fn malformed_tracks_do_not_panic() {
        let empty: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
        assert_eq!(empty.sample(0.5), None);
        assert!(!empty.is_valid());

        let short = KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32], InterpolationMode::Linear);
        assert!(!short.is_valid());
        assert_eq!(short.sample_with_cursor(0.5, &mut KeyframeCursor::default()), None);
    }
}
