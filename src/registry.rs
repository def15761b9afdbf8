//! Static filter registry and per-render filter configuration.
//!
//! Each filter is a tagged variant with a fixed descriptor: a display name and
//! the parameter kinds it accepts. Descriptors live in [`FILTERS`] for the
//! whole program. Their fields are private, so every descriptor a caller can
//! hold is one of the registry's own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::ParameterKind;

/// Filters the engine can apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Crystallize,
    Edges,
    GaussianBlur,
    Pixellate,
    SepiaTone,
    UnsharpMask,
    Vignette,
}

impl FilterKind {
    pub fn descriptor(self) -> &'static FilterDescriptor {
        // FILTERS is ordered like the enum.
        &FILTERS[self as usize]
    }

    /// The filter's own value for `kind`, or `None` if it has no such input.
    pub fn default_value(self, kind: ParameterKind) -> Option<f32> {
        use ParameterKind::*;
        match (self, kind) {
            (Self::Crystallize, Radius) => Some(20.0),
            (Self::Edges, Intensity) => Some(1.0),
            (Self::GaussianBlur, Radius) => Some(10.0),
            (Self::Pixellate, Scale) => Some(8.0),
            (Self::SepiaTone, Intensity) => Some(1.0),
            (Self::UnsharpMask, Intensity) => Some(0.5),
            (Self::UnsharpMask, Radius) => Some(2.5),
            (Self::Vignette, Intensity) => Some(0.0),
            (Self::Vignette, Radius) => Some(1.0),
            _ => None,
        }
    }
}

/// A selectable filter.
#[derive(Debug, PartialEq, Eq)]
pub struct FilterDescriptor {
    kind: FilterKind,
    name: &'static str,
    supported: &'static [ParameterKind],
}

impl FilterDescriptor {
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Display name, e.g. "Gaussian Blur".
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parameter kinds the filter accepts.
    pub fn supported(&self) -> &'static [ParameterKind] {
        self.supported
    }

    pub fn supports(&self, kind: ParameterKind) -> bool {
        self.supported.contains(&kind)
    }

    /// Configuration holding only this filter's own defaults.
    pub fn default_config(&self) -> FilterConfig {
        let mut config = FilterConfig::default();
        for &kind in self.supported {
            if let Some(value) = self.kind.default_value(kind) {
                config.set(kind, value);
            }
        }
        config
    }
}

/// Every filter, in menu order.
pub static FILTERS: [FilterDescriptor; 7] = [
    FilterDescriptor {
        kind: FilterKind::Crystallize,
        name: "Crystalize",
        supported: &[ParameterKind::Radius],
    },
    FilterDescriptor {
        kind: FilterKind::Edges,
        name: "Edges",
        supported: &[ParameterKind::Intensity],
    },
    FilterDescriptor {
        kind: FilterKind::GaussianBlur,
        name: "Gaussian Blur",
        supported: &[ParameterKind::Radius],
    },
    FilterDescriptor {
        kind: FilterKind::Pixellate,
        name: "Pixellate",
        supported: &[ParameterKind::Scale],
    },
    FilterDescriptor {
        kind: FilterKind::SepiaTone,
        name: "Sepia Tone",
        supported: &[ParameterKind::Intensity],
    },
    FilterDescriptor {
        kind: FilterKind::UnsharpMask,
        name: "Unsharp Mask",
        supported: &[ParameterKind::Intensity, ParameterKind::Radius],
    },
    FilterDescriptor {
        kind: FilterKind::Vignette,
        name: "Vignette",
        supported: &[ParameterKind::Intensity, ParameterKind::Radius],
    },
];

/// Filter selected when a session starts.
pub fn default_filter() -> &'static FilterDescriptor {
    FilterKind::SepiaTone.descriptor()
}

/// Look a filter up by display name, exact match first, then ignoring case.
pub fn find_filter(name: &str) -> Option<&'static FilterDescriptor> {
    let name = name.trim();
    FILTERS
        .iter()
        .find(|f| f.name == name)
        .or_else(|| FILTERS.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
}

/// Display names in menu order.
pub fn filter_names() -> impl Iterator<Item = &'static str> {
    FILTERS.iter().map(|f| f.name)
}

/// Key/value inputs handed to the render capability for one render.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    values: BTreeMap<ParameterKind, f32>,
}

impl FilterConfig {
    pub fn get(&self, kind: ParameterKind) -> Option<f32> {
        self.values.get(&kind).copied()
    }

    pub fn set(&mut self, kind: ParameterKind, value: f32) {
        self.values.insert(kind, value);
    }

    pub fn contains(&self, kind: ParameterKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, f32)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
