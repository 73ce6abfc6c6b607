//! Designspace model for glyph delta computation.
//!
//! Axes in user space, masters placed on them, and the normalization that
//! turns master positions into variation model locations.

use std::{collections::BTreeMap, path::PathBuf};

use font_types::Tag;
use varlib_variation_model::{Location, VariationModel};

use crate::{
    config::STANDARD_AXES,
    error::{Error, Result},
};

/// A variation axis in the designspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Four-character axis tag (e.g., "wght", "ital")
    pub tag: Tag,
    /// Designspace axis name, the key used in master locations (e.g., "weight")
    pub name: String,
    /// Human-readable axis name
    pub display_name: String,
    /// Minimum value on this axis
    pub minimum: f64,
    /// Default value on this axis
    pub default: f64,
    /// Maximum value on this axis
    pub maximum: f64,
}

impl Axis {
    /// Create a new axis.
    pub fn new(tag: Tag, name: &str, minimum: f64, default: f64, maximum: f64) -> Self {
        Self {
            tag,
            name: name.to_string(),
            display_name: name.to_string(),
            minimum,
            default,
            maximum,
        }
    }

    /// Create an axis from its designspace name.
    ///
    /// Registered names ("weight", "width", ...) get their standard tag and
    /// display name; any other name must itself be a valid tag.
    pub fn from_name(name: &str, minimum: f64, default: f64, maximum: f64) -> Result<Self> {
        let (tag, display_name) = match STANDARD_AXES.iter().find(|(key, _, _)| *key == name) {
            Some(&(_, tag, display_name)) => (tag, display_name.to_string()),
            None => {
                let tag: Tag = name.parse().map_err(|_| Error::InvalidAxisTag(name.to_string()))?;
                (tag, name.to_string())
            }
        };
        Ok(Self {
            tag,
            name: name.to_string(),
            display_name,
            minimum,
            default,
            maximum,
        })
    }

    /// Set the human-readable name.
    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = display_name.to_string();
        self
    }

    /// Normalize a user-space value to the range [-1, 1].
    ///
    /// Values below the default normalize to [-1, 0].
    /// Values above the default normalize to [0, 1].
    pub fn normalize(&self, value: f64) -> f64 {
        if value < self.default {
            if self.default == self.minimum {
                0.0
            } else {
                -((self.default - value) / (self.default - self.minimum))
            }
        } else if value > self.default {
            if self.default == self.maximum {
                0.0
            } else {
                (value - self.default) / (self.maximum - self.default)
            }
        } else {
            0.0
        }
    }
}

/// A master in the designspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Master {
    /// Master name
    pub name: String,
    /// Path to the master's binary font
    pub filename: PathBuf,
    /// User-space location keyed by designspace axis name
    pub location: BTreeMap<String, f64>,
}

impl Master {
    /// Create a new master with the given name, file and location.
    pub fn new<'a>(
        name: &str,
        filename: impl Into<PathBuf>,
        location: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        Self {
            name: name.to_string(),
            filename: filename.into(),
            location: location.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    /// Get the value for an axis, or the axis default if not specified.
    pub fn axis_value(&self, axis: &Axis) -> f64 {
        self.location.get(&axis.name).copied().unwrap_or(axis.default)
    }

    /// Get the normalized location of this master.
    pub fn normalized_location(&self, axes: &[Axis]) -> Location {
        axes.iter()
            .map(|axis| (axis.tag, axis.normalize(self.axis_value(axis))))
            .collect()
    }
}

/// Axes and masters making up a variable font design.
#[derive(Debug, Clone)]
pub struct DesignSpace {
    /// Variation axes, in priority order
    pub axes: Vec<Axis>,
    /// Masters, in the order their data is supplied
    pub masters: Vec<Master>,
    /// Index of the master marked as the base, if any
    pub base_index: Option<usize>,
}

impl DesignSpace {
    /// Create a new designspace with the given axes and masters.
    pub fn new(axes: Vec<Axis>, masters: Vec<Master>) -> Self {
        Self { axes, masters, base_index: None }
    }

    /// Mark the master at `index` as the base.
    pub fn with_base(mut self, index: usize) -> Self {
        self.base_index = Some(index);
        self
    }

    /// Build a designspace whose axes span the masters.
    ///
    /// Every master must define the same axes. Each axis runs from the lowest
    /// to the highest master value, with its default at the base master.
    pub fn from_masters(masters: Vec<Master>, base_index: usize) -> Result<Self> {
        let base = masters.get(base_index).ok_or_else(|| {
            Error::InvalidDesignspace(format!(
                "base master index {base_index} out of range for {} masters",
                masters.len()
            ))
        })?;

        if let Some(master) = masters
            .iter()
            .find(|master| !master.location.keys().eq(base.location.keys()))
        {
            return Err(Error::InvalidDesignspace(format!(
                "master '{}' does not define the same axes as base master '{}'",
                master.name, base.name
            )));
        }

        let axes = base
            .location
            .iter()
            .map(|(name, &default)| {
                let values = masters.iter().map(|master| master.location[name]);
                let minimum = values.clone().fold(default, f64::min);
                let maximum = values.fold(default, f64::max);
                Axis::from_name(name, minimum, default, maximum)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { axes, masters, base_index: Some(base_index) })
    }

    /// Find the index of the default master.
    ///
    /// This is the marked base if there is one, otherwise the first master at
    /// the default of every axis.
    pub fn default_index(&self) -> Option<usize> {
        self.base_index.or_else(|| {
            self.masters
                .iter()
                .position(|master| master.normalized_location(&self.axes).is_default())
        })
    }

    /// Find the default master.
    pub fn default_master(&self) -> Option<&Master> {
        self.default_index().and_then(|index| self.masters.get(index))
    }

    /// Normalized locations of all masters, in master order.
    pub fn normalized_locations(&self) -> Vec<Location> {
        self.masters
            .iter()
            .map(|master| master.normalized_location(&self.axes))
            .collect()
    }

    /// Axis tags in declaration order, used to prioritize master ordering.
    pub fn axis_order(&self) -> Vec<Tag> {
        self.axes.iter().map(|axis| axis.tag).collect()
    }

    /// Validate the designspace.
    pub fn validate(&self) -> Result<()> {
        if self.masters.is_empty() {
            return Err(Error::InvalidDesignspace(
                "Designspace must have at least one master".to_string(),
            ));
        }

        for (idx, axis) in self.axes.iter().enumerate() {
            if self.axes[..idx].iter().any(|prev| prev.tag == axis.tag) {
                return Err(Error::InvalidDesignspace(format!(
                    "Axis tag '{}' is used more than once",
                    axis.tag
                )));
            }
            if !(axis.minimum <= axis.default && axis.default <= axis.maximum) {
                return Err(Error::InvalidDesignspace(format!(
                    "Axis '{}' default {} is outside [{}, {}]",
                    axis.tag, axis.default, axis.minimum, axis.maximum
                )));
            }
        }

        let default = self.default_master().ok_or(Error::NoDefaultSource)?;
        if !default.normalized_location(&self.axes).is_default() {
            return Err(Error::NoDefaultSource);
        }

        Ok(())
    }

    /// Validate the designspace and build the variation model for its masters.
    pub fn build_model(&self) -> Result<VariationModel> {
        self.validate()?;
        let model = VariationModel::new(&self.normalized_locations(), &self.axis_order())?;
        Ok(model)
    }
}
