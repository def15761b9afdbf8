//! Adjustable parameters: the three sliders and how they reach a filter.
//!
//! | Kind | Domain | Slider default | Config key |
//! |------|--------|----------------|------------|
//! | Intensity | 0.0-1.0 | 0.5 | `intensity` |
//! | Radius | 0.0-200.0 | 100.0 | `radius` |
//! | Scale | 0.0-10.0 | 5.0 | `scale` |
//!
//! Slider values are independent of the selected filter and survive filter
//! changes. Which of them a filter actually receives is decided by the filter's
//! descriptor (see [`crate::registry`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the tunables a filter may accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Intensity,
    Radius,
    Scale,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 3] = [Self::Intensity, Self::Radius, Self::Scale];

    /// Canonical configuration key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Intensity => "intensity",
            Self::Radius => "radius",
            Self::Scale => "scale",
        }
    }

    /// Inclusive `(min, max)` slider domain.
    pub fn domain(self) -> (f32, f32) {
        match self {
            Self::Intensity => (0.0, 1.0),
            Self::Radius => (0.0, 200.0),
            Self::Scale => (0.0, 10.0),
        }
    }

    /// Clamp `value` into this kind's domain.
    ///
    /// Returns `None` for NaN, which has no meaningful position on a slider.
    pub fn clamp_value(self, value: f32) -> Option<f32> {
        if value.is_nan() {
            return None;
        }
        let (min, max) = self.domain();
        Some(value.clamp(min, max))
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ParameterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intensity" => Ok(Self::Intensity),
            "radius" => Ok(Self::Radius),
            "scale" => Ok(Self::Scale),
            _ => Err(Error::UnknownParameter(s.to_string())),
        }
    }
}

/// Current slider positions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub intensity: f32,
    pub radius: f32,
    pub scale: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            radius: 100.0,
            scale: 5.0,
        }
    }
}

impl ParameterSet {
    pub fn get(&self, kind: ParameterKind) -> f32 {
        match kind {
            ParameterKind::Intensity => self.intensity,
            ParameterKind::Radius => self.radius,
            ParameterKind::Scale => self.scale,
        }
    }

    /// Store a clamped value. Returns the stored value, or `None` if `value`
    /// was NaN and the set is unchanged.
    pub fn set(&mut self, kind: ParameterKind, value: f32) -> Option<f32> {
        let value = kind.clamp_value(value)?;
        match kind {
            ParameterKind::Intensity => self.intensity = value,
            ParameterKind::Radius => self.radius = value,
            ParameterKind::Scale => self.scale = value,
        }
        Some(value)
    }

    /// Copy with every value clamped into its domain; NaN falls back to the default.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let mut out = defaults;
        for kind in ParameterKind::ALL {
            if out.set(kind, self.get(kind)).is_none() {
                out.set(kind, defaults.get(kind));
            }
        }
        out
    }
}

/// How slider values turn into filter inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterMapping {
    /// Each kind is fed from its own slider.
    #[default]
    Independent,
    /// A single intensity slider drives everything:
    /// radius = intensity * 200, scale = intensity * 10.
    Linked,
}

impl ParameterMapping {
    /// Value to push into the filter configuration for `kind`.
    pub fn resolve(self, kind: ParameterKind, params: &ParameterSet) -> f32 {
        match self {
            Self::Independent => params.get(kind),
            Self::Linked => {
                let (_, max) = kind.domain();
                match kind {
                    ParameterKind::Intensity => params.intensity,
                    ParameterKind::Radius | ParameterKind::Scale => params.intensity * max,
                }
            }
        }
    }
}
