use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Scalar parameters controlling the sun position and atmospheric scattering.
///
/// Writes through [`set`](Self::set) never fail: ranged fields clamp to their
/// bounds and `azimuth` wraps modulo 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOfDayState {
    /// Atmospheric haze (≥ 0)
    pub turbidity: f32,
    /// Rayleigh scattering strength (≥ 0)
    pub rayleigh: f32,
    /// Mie scattering coefficient (≥ 0)
    pub mie_coefficient: f32,
    /// Mie phase anisotropy in `[0, 1]`
    pub mie_directional_g: f32,
    /// Sun inclination in `[0, 1]`
    pub inclination: f32,
    /// Cyclic sun azimuth in `[0, 1)`
    pub azimuth: f32,
    /// Tone-mapping exposure in `[0, 1]`
    pub exposure: f32,
}

impl Default for TimeOfDayState {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 3.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.7,
            inclination: 0.0,
            azimuth: 0.0,
            exposure: 0.5,
        }
    }
}

/// Addressable fields of [`TimeOfDayState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDayParam {
    Turbidity,
    Rayleigh,
    MieCoefficient,
    MieDirectionalG,
    Inclination,
    Azimuth,
    Exposure,
}

impl TimeOfDayParam {
    pub const ALL: [Self; 7] = [
        Self::Turbidity,
        Self::Rayleigh,
        Self::MieCoefficient,
        Self::MieDirectionalG,
        Self::Inclination,
        Self::Azimuth,
        Self::Exposure,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Turbidity => "turbidity",
            Self::Rayleigh => "rayleigh",
            Self::MieCoefficient => "mieCoefficient",
            Self::MieDirectionalG => "mieDirectionalG",
            Self::Inclination => "inclination",
            Self::Azimuth => "azimuth",
            Self::Exposure => "exposure",
        }
    }

    /// Value bounds of the field itself. Unbounded maxima use `f32::MAX`.
    #[must_use]
    pub fn bounds(self) -> RangeInclusive<f32> {
        match self {
            Self::Turbidity | Self::Rayleigh | Self::MieCoefficient => 0.0..=f32::MAX,
            Self::MieDirectionalG | Self::Inclination | Self::Azimuth | Self::Exposure => 0.0..=1.0,
        }
    }

    /// Slider range offered by interactive control surfaces.
    #[must_use]
    pub fn control_range(self) -> RangeInclusive<f32> {
        match self {
            Self::Turbidity => 0.0..=20.0,
            Self::Rayleigh => 0.0..=4.0,
            Self::MieCoefficient => 0.0..=0.1,
            Self::MieDirectionalG | Self::Inclination | Self::Azimuth | Self::Exposure => 0.0..=1.0,
        }
    }

    /// Slider step offered by interactive control surfaces.
    #[must_use]
    pub fn control_step(self) -> f32 {
        match self {
            Self::Turbidity => 0.1,
            Self::Rayleigh | Self::MieCoefficient | Self::MieDirectionalG => 0.001,
            Self::Inclination | Self::Azimuth | Self::Exposure => 0.0001,
        }
    }
}

/// Wraps a value into `[0, 1)`.
#[must_use]
pub fn wrap_unit(value: f32) -> f32 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

impl TimeOfDayState {
    #[must_use]
    pub fn get(&self, param: TimeOfDayParam) -> f32 {
        match param {
            TimeOfDayParam::Turbidity => self.turbidity,
            TimeOfDayParam::Rayleigh => self.rayleigh,
            TimeOfDayParam::MieCoefficient => self.mie_coefficient,
            TimeOfDayParam::MieDirectionalG => self.mie_directional_g,
            TimeOfDayParam::Inclination => self.inclination,
            TimeOfDayParam::Azimuth => self.azimuth,
            TimeOfDayParam::Exposure => self.exposure,
        }
    }

    /// Writes a field, clamping (or wrapping, for azimuth) into range.
    ///
    /// NaN is ignored, as is an infinite azimuth, since neither has a
    /// nearest valid value. Returns the value actually stored.
    pub fn set(&mut self, param: TimeOfDayParam, value: f32) -> f32 {
        let current = self.get(param);
        let stored = if value.is_nan() {
            log::warn!("Ignoring NaN write to {}", param.name());
            current
        } else if param == TimeOfDayParam::Azimuth {
            if value.is_finite() {
                wrap_unit(value)
            } else {
                log::warn!("Ignoring non-finite azimuth {value}");
                current
            }
        } else {
            let bounds = param.bounds();
            value.clamp(*bounds.start(), *bounds.end())
        };

        match param {
            TimeOfDayParam::Turbidity => self.turbidity = stored,
            TimeOfDayParam::Rayleigh => self.rayleigh = stored,
            TimeOfDayParam::MieCoefficient => self.mie_coefficient = stored,
            TimeOfDayParam::MieDirectionalG => self.mie_directional_g = stored,
            TimeOfDayParam::Inclination => self.inclination = stored,
            TimeOfDayParam::Azimuth => self.azimuth = stored,
            TimeOfDayParam::Exposure => self.exposure = stored,
        }
        stored
    }

    /// Returns a copy with every field forced into range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let mut out = Self::default();
        for param in TimeOfDayParam::ALL {
            out.set(param, self.get(param));
        }
        out
    }

    /// Advances the azimuth by `step`, wrapping modulo 1.
    pub fn advance_azimuth(&mut self, step: f32) -> f32 {
        self.set(TimeOfDayParam::Azimuth, self.azimuth + step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unit_stays_half_open() {
        assert_eq!(wrap_unit(1.0), 0.0);
        assert_eq!(wrap_unit(-1e-12), 0.0);
        assert!((wrap_unit(1.25) - 0.25).abs() < 1e-6);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn sanitized_replaces_nan_with_defaults() {
        let state = TimeOfDayState {
            turbidity: f32::NAN,
            exposure: 3.0,
            ..TimeOfDayState::default()
        }
        .sanitized();
        assert_eq!(state.turbidity, TimeOfDayState::default().turbidity);
        assert_eq!(state.exposure, 1.0);
    }
}
