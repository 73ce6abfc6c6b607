//! Sparse locations in normalized design space.

use std::{collections::BTreeMap, fmt};

use font_types::Tag;

/// A point in normalized design space.
///
/// Only non-default coordinates are stored. Setting an axis to `0.0` removes it,
/// so `{wght: 0, wdth: 0.3}` and `{wdth: 0.3}` are the same location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location(BTreeMap<Tag, f64>);

impl Location {
    /// The default location, where every axis is at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return this location with `axis` moved to `value`.
    pub fn with(mut self, axis: Tag, value: f64) -> Self {
        self.set(axis, value);
        self
    }

    /// Move `axis` to `value`; a zero value drops the axis.
    pub fn set(&mut self, axis: Tag, value: f64) {
        if value == 0.0 {
            self.0.remove(&axis);
        } else {
            self.0.insert(axis, value);
        }
    }

    /// The coordinate on `axis`, or `None` when the axis is at its default.
    pub fn get(&self, axis: Tag) -> Option<f64> {
        self.0.get(&axis).copied()
    }

    /// The coordinate on `axis`, with defaulted axes reading as `0.0`.
    pub fn value(&self, axis: Tag) -> f64 {
        self.get(axis).unwrap_or(0.0)
    }

    pub fn contains(&self, axis: Tag) -> bool {
        self.0.contains_key(&axis)
    }

    /// Number of non-default axes.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// True for the default location.
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-default axes in ascending tag order.
    pub fn axes(&self) -> impl Iterator<Item = Tag> + '_ {
        self.0.keys().copied()
    }

    /// `(axis, value)` pairs in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, f64)> + '_ {
        self.0.iter().map(|(axis, value)| (*axis, *value))
    }

    /// True if every axis of this location is also set in `other`.
    pub fn is_subset_of(&self, other: &Location) -> bool {
        self.0.keys().all(|axis| other.0.contains_key(axis))
    }
}

impl FromIterator<(Tag, f64)> for Location {
    fn from_iter<I: IntoIterator<Item = (Tag, f64)>>(iter: I) -> Self {
        let mut location = Location::new();
        for (axis, value) in iter {
            location.set(axis, value);
        }
        location
    }
}

impl<const N: usize> From<[(Tag, f64); N]> for Location {
    fn from(coords: [(Tag, f64); N]) -> Self {
        coords.into_iter().collect()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (axis, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{axis}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGHT: Tag = Tag::new(b"wght");
    const WDTH: Tag = Tag::new(b"wdth");

    #[test]
    fn zero_coordinates_are_pruned() {
        let location = Location::from([(WGHT, 0.0), (WDTH, 0.3)]);

        assert_eq!(location.rank(), 1);
        assert!(!location.contains(WGHT));
        assert_eq!(location, Location::new().with(WDTH, 0.3));
    }

    #[test]
    fn negative_zero_is_default() {
        let location = Location::from([(WGHT, -0.0)]);
        assert!(location.is_default());
    }

    #[test]
    fn setting_zero_removes_axis() {
        let mut location = Location::new().with(WGHT, 0.5);
        location.set(WGHT, 0.0);
        assert!(location.is_default());
        assert_eq!(location.value(WGHT), 0.0);
    }

    #[test]
    fn subset_of() {
        let wght = Location::new().with(WGHT, 1.0);
        let both = Location::from([(WGHT, 0.5), (WDTH, 1.0)]);

        assert!(wght.is_subset_of(&both));
        assert!(!both.is_subset_of(&wght));
        assert!(Location::new().is_subset_of(&wght));
    }

    #[test]
    fn display_lists_axes_in_tag_order() {
        let location = Location::from([(WGHT, 180.0), (WDTH, 0.3)]);
        assert_eq!(location.to_string(), "{wdth: 0.3, wght: 180}");
        assert_eq!(Location::new().to_string(), "{}");
    }
}
