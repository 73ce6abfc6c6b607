//! Support regions and their piecewise-linear basis functions.

use std::collections::BTreeMap;

use font_types::Tag;

use crate::location::Location;

/// The extent of a master's influence along one axis.
///
/// The basis value is 1 at `peak` and falls linearly to 0 at `lower` and
/// `upper`. A side where the bound equals the peak has zero width: the master
/// has no influence past its peak on that side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tent {
    pub lower: f64,
    pub peak: f64,
    pub upper: f64,
}

impl Tent {
    pub fn new(lower: f64, peak: f64, upper: f64) -> Self {
        Self { lower, peak, upper }
    }

    /// Basis value of this tent at `value`.
    ///
    /// Points on or beyond either bound score 0 unless they sit exactly on the
    /// peak, so a zero-width side never divides by zero.
    pub fn scalar_at(&self, value: f64) -> f64 {
        if value == self.peak {
            1.0
        } else if value <= self.lower || self.upper <= value {
            0.0
        } else if value < self.peak {
            (value - self.peak) / (self.lower - self.peak)
        } else {
            (value - self.peak) / (self.upper - self.peak)
        }
    }
}

/// The support box of one master.
///
/// Axes without a tent are unconstrained. The region of the base master has no
/// tents at all and scores 1 everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    axes: BTreeMap<Tag, Tent>,
}

impl Region {
    /// The unconstrained region.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, axis: Tag, tent: Tent) -> Self {
        self.insert(axis, tent);
        self
    }

    pub fn insert(&mut self, axis: Tag, tent: Tent) {
        self.axes.insert(axis, tent);
    }

    pub fn get(&self, axis: Tag) -> Option<&Tent> {
        self.axes.get(&axis)
    }

    pub(crate) fn get_mut(&mut self, axis: Tag) -> Option<&mut Tent> {
        self.axes.get_mut(&axis)
    }

    /// Constrained axes and their tents, in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &Tent)> + '_ {
        self.axes.iter().map(|(axis, tent)| (*axis, tent))
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// The location where this region's basis function peaks.
    pub fn peak(&self) -> Location {
        self.iter().map(|(axis, tent)| (axis, tent.peak)).collect()
    }

    /// Evaluate this region's basis function at `location`.
    ///
    /// The result is the product of every tent's value at the location's
    /// coordinate on that axis. A location at the default of a constrained axis
    /// scores 0.
    pub fn scalar_at(&self, location: &Location) -> f64 {
        let mut scalar = 1.0;
        for (axis, tent) in self.iter() {
            let Some(value) = location.get(axis) else {
                return 0.0;
            };
            if value == tent.peak {
                continue;
            }
            let axis_scalar = tent.scalar_at(value);
            if axis_scalar == 0.0 {
                return 0.0;
            }
            scalar *= axis_scalar;
        }
        scalar
    }
}
