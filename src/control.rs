//! Control Surface
//!
//! Read/write access to the time-of-day parameters for interactive panels.
//! Each parameter is published with the slider range and step a panel should
//! offer; writes are clamped to that range before reaching the state.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::sky::{TimeOfDayParam, TimeOfDayState};

/// One parameter write from a control surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlChange {
    pub param: TimeOfDayParam,
    pub value: f32,
}

impl ControlChange {
    #[must_use]
    pub fn new(param: TimeOfDayParam, value: f32) -> Self {
        Self { param, value }
    }
}

/// Everything a panel needs to render one slider.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    pub param: TimeOfDayParam,
    pub name: &'static str,
    pub range: RangeInclusive<f32>,
    pub step: f32,
    pub value: f32,
}

/// Lists every parameter with its current value.
#[must_use]
pub fn describe(state: &TimeOfDayState) -> Vec<ParamDescriptor> {
    TimeOfDayParam::ALL
        .iter()
        .map(|&param| ParamDescriptor {
            param,
            name: param.name(),
            range: param.control_range(),
            step: param.control_step(),
            value: state.get(param),
        })
        .collect()
}

/// Applies `change` to `state`, clamped to the control range.
///
/// Azimuth is cyclic and wraps modulo 1 instead. Returns the value actually
/// stored.
pub fn apply(state: &mut TimeOfDayState, change: ControlChange) -> f32 {
    let range = change.param.control_range();
    let value = if change.value.is_nan() || change.param == TimeOfDayParam::Azimuth {
        change.value
    } else {
        change.value.clamp(*range.start(), *range.end())
    };
    let stored = state.set(change.param, value);
    log::debug!("Control write {} = {stored}", change.param.name());
    stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turbidity_write_clamps_to_slider_range() {
        let mut state = TimeOfDayState::default();
        assert_eq!(apply(&mut state, ControlChange::new(TimeOfDayParam::Turbidity, 50.0)), 20.0);
        assert_eq!(state.turbidity, 20.0);
    }

    #[test]
    fn azimuth_write_wraps_instead_of_clamping() {
        let mut state = TimeOfDayState::default();
        assert!((apply(&mut state, ControlChange::new(TimeOfDayParam::Azimuth, 1.25)) - 0.25).abs() < 1e-6);
        assert!((apply(&mut state, ControlChange::new(TimeOfDayParam::Azimuth, -0.25)) - 0.75).abs() < 1e-6);
        assert!((state.azimuth - 0.75).abs() < 1e-6);
    }

    #[test]
    fn describe_lists_all_parameters() {
        let descriptors = describe(&TimeOfDayState::default());
        assert_eq!(descriptors.len(), 7);
        assert_eq!(descriptors[1].name, "rayleigh");
        assert_eq!(descriptors[1].value, 3.0);
    }
}
