//! Variation model for computing master deltas.
//!
//! Masters are sorted into a canonical order, each master gets a support
//! region bounded by its neighbours on every axis it sits on, and each master's
//! delta is its raw value minus the weighted deltas of the masters before it.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    ops::{Add, Mul, Sub},
};

use font_types::Tag;
use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::{
    error::{Error, Result},
    location::Location,
    region::{Region, Tent},
};

/// Sorted on-axis sample values per axis, always including the default `0.0`.
pub type AxisPoints = BTreeMap<Tag, Vec<f64>>;

/// Support regions and delta weights for a set of master locations.
///
/// Masters are addressed by the index they were supplied at ("original" index).
/// The canonical processing order is exposed through [`to_canonical`] and
/// [`to_original`].
///
/// [`to_canonical`]: VariationModel::to_canonical
/// [`to_original`]: VariationModel::to_original
#[derive(Debug, Clone)]
pub struct VariationModel {
    /// Pruned locations in original order
    locations: Vec<Location>,
    /// Locations in canonical order
    sorted_locations: Vec<Location>,
    axis_points: AxisPoints,
    /// canonical index -> original index
    mapping: Vec<usize>,
    /// original index -> canonical index
    reverse_mapping: Vec<usize>,
    /// Support regions in original order
    supports: Vec<Region>,
    /// Delta weights in original order, keyed by original index
    delta_weights: Vec<IndexMap<usize, f64>>,
    /// Delta weights in canonical order, keyed by canonical index
    canonical_weights: Vec<Vec<(usize, f64)>>,
}

impl VariationModel {
    /// Build a model from master locations in normalized space.
    ///
    /// `axis_order` lists the axes that take precedence when ordering masters;
    /// axes not listed follow in ascending tag order.
    ///
    /// Fails if no location is the default location, if two masters share a
    /// location, or if two single-axis masters share a point on their axis.
    pub fn new(locations: &[Location], axis_order: &[Tag]) -> Result<Self> {
        if !locations.iter().any(Location::is_default) {
            return Err(Error::MissingBase);
        }

        let axis_points = collect_axis_points(locations)?;
        check_duplicates(locations)?;

        let keys: Vec<SortKey> = locations
            .iter()
            .map(|location| SortKey::new(location, &axis_points, axis_order))
            .collect();
        let mut mapping: Vec<usize> = (0..locations.len()).collect();
        mapping.sort_by(|&a, &b| keys[a].compare(&keys[b]));

        let mut reverse_mapping = vec![0; locations.len()];
        for (canonical, &original) in mapping.iter().enumerate() {
            reverse_mapping[original] = canonical;
        }

        let sorted_locations: Vec<Location> =
            mapping.iter().map(|&original| locations[original].clone()).collect();

        let mut canonical_supports: Vec<Region> = Vec::with_capacity(locations.len());
        let mut canonical_weights: Vec<Vec<(usize, f64)>> = Vec::with_capacity(locations.len());

        for (idx, location) in sorted_locations.iter().enumerate() {
            let support = compute_support(location, &sorted_locations[..idx], &axis_points);
            canonical_supports.push(support);

            let weights: Vec<(usize, f64)> = canonical_supports[..idx]
                .iter()
                .enumerate()
                .filter_map(|(prev, region)| {
                    let scalar = region.scalar_at(location);
                    (scalar != 0.0).then_some((prev, -scalar))
                })
                .collect();
            canonical_weights.push(weights);
        }

        let supports: Vec<Region> = reverse_mapping
            .iter()
            .map(|&canonical| canonical_supports[canonical].clone())
            .collect();
        let delta_weights: Vec<IndexMap<usize, f64>> = reverse_mapping
            .iter()
            .map(|&canonical| {
                canonical_weights[canonical]
                    .iter()
                    .map(|&(prev, weight)| (mapping[prev], weight))
                    .collect()
            })
            .collect();

        debug!(
            "Variation model: {} masters over axes [{}]",
            locations.len(),
            axis_points.keys().map(Tag::to_string).collect::<Vec<_>>().join(", ")
        );
        for (idx, (location, region)) in sorted_locations.iter().zip(&canonical_supports).enumerate() {
            debug!("  #{idx} master {} at {location}: {region:?}", mapping[idx]);
        }

        Ok(Self {
            locations: locations.to_vec(),
            sorted_locations,
            axis_points,
            mapping,
            reverse_mapping,
            supports,
            delta_weights,
            canonical_weights,
        })
    }

    /// Number of masters.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false: a model holds at least the base master.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Master locations in the order they were supplied, with default axes pruned.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Master locations in canonical order. The base location is always first.
    pub fn canonical_order(&self) -> &[Location] {
        &self.sorted_locations
    }

    /// On-axis sample points used to bound support regions.
    pub fn axis_points(&self) -> &AxisPoints {
        &self.axis_points
    }

    /// Canonical position of the master supplied at `original`.
    ///
    /// # Panics
    ///
    /// Panics if `original` is not a master index of this model.
    pub fn to_canonical(&self, original: usize) -> usize {
        self.reverse_mapping[original]
    }

    /// Original index of the master at canonical position `canonical`.
    ///
    /// # Panics
    ///
    /// Panics if `canonical` is out of range.
    pub fn to_original(&self, canonical: usize) -> usize {
        self.mapping[canonical]
    }

    /// Original index for every canonical position.
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// Canonical position for every original index.
    pub fn reverse_mapping(&self) -> &[usize] {
        &self.reverse_mapping
    }

    /// Index of the base master in the original order.
    pub fn base_index(&self) -> usize {
        self.mapping[0]
    }

    /// Support region of the master supplied at `original`.
    ///
    /// # Panics
    ///
    /// Panics if `original` is not a master index of this model.
    pub fn support(&self, original: usize) -> &Region {
        &self.supports[original]
    }

    /// Support region of the master supplied at `original`, if there is one.
    pub fn get_support(&self, original: usize) -> Option<&Region> {
        self.supports.get(original)
    }

    /// Support regions in original order.
    pub fn supports(&self) -> &[Region] {
        &self.supports
    }

    /// Non-zero weights of earlier masters in the delta of the master at `original`.
    ///
    /// Keys are original indices, iterated in canonical order. The master's own
    /// weight of `1.0` is implied and not included.
    ///
    /// # Panics
    ///
    /// Panics if `original` is not a master index of this model.
    pub fn delta_weights(&self, original: usize) -> &IndexMap<usize, f64> {
        &self.delta_weights[original]
    }

    /// Non-panicking form of [`delta_weights`](Self::delta_weights).
    pub fn get_delta_weights(&self, original: usize) -> Option<&IndexMap<usize, f64>> {
        self.delta_weights.get(original)
    }

    /// Compute deltas from master values.
    ///
    /// `master_values` are indexed by original master index. The returned deltas
    /// are in canonical order: the first is the base value itself, each later one
    /// is what that master adds on top of everything before it.
    pub fn get_deltas<T>(&self, master_values: &[T]) -> Result<Vec<T>>
    where
        T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    {
        self.check_count(master_values.len())?;

        let mut deltas: Vec<T> = Vec::with_capacity(master_values.len());
        for (canonical, weights) in self.canonical_weights.iter().enumerate() {
            let mut delta = master_values[self.mapping[canonical]];
            for &(prev, weight) in weights {
                delta = delta + deltas[prev] * weight;
            }
            deltas.push(delta);
        }
        Ok(deltas)
    }

    /// Rebuild master values, in original order, from canonical-order deltas.
    ///
    /// This inverts [`get_deltas`](Self::get_deltas).
    pub fn reconstruct<T>(&self, deltas: &[T]) -> Result<Vec<T>>
    where
        T: Copy + Sub<Output = T> + Mul<f64, Output = T>,
    {
        self.check_count(deltas.len())?;

        let values: Vec<T> = self
            .canonical_weights
            .iter()
            .enumerate()
            .map(|(canonical, weights)| {
                weights
                    .iter()
                    .fold(deltas[canonical], |value, &(prev, weight)| value - deltas[prev] * weight)
            })
            .collect();
        Ok(self.reverse_mapping.iter().map(|&canonical| values[canonical]).collect())
    }

    /// Every master's support scalar at `location`, in canonical order.
    pub fn scalars_at(&self, location: &Location) -> Vec<f64> {
        self.mapping
            .iter()
            .map(|&original| self.supports[original].scalar_at(location))
            .collect()
    }

    /// Interpolate a value at `location` from canonical-order deltas.
    pub fn interpolate_from_deltas<T>(&self, location: &Location, deltas: &[T]) -> Result<T>
    where
        T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    {
        self.check_count(deltas.len())?;

        // The base region is unconstrained, so its scalar is always 1.
        let value = self
            .scalars_at(location)
            .into_iter()
            .zip(deltas)
            .skip(1)
            .filter(|(scalar, _)| *scalar != 0.0)
            .fold(deltas[0], |value, (scalar, &delta)| value + delta * scalar);
        Ok(value)
    }

    fn check_count(&self, actual: usize) -> Result<()> {
        if actual != self.len() {
            return Err(Error::MasterCountMismatch { expected: self.len(), actual });
        }
        Ok(())
    }
}

/// Gather `{0} ∪ {v : some single-axis master sits at v}` for every axis.
fn collect_axis_points(locations: &[Location]) -> Result<AxisPoints> {
    let mut axis_points: AxisPoints = BTreeMap::new();
    for axis in locations.iter().flat_map(Location::axes) {
        axis_points.entry(axis).or_insert_with(|| vec![0.0]);
    }

    for location in locations.iter().filter(|location| location.rank() == 1) {
        let Some((axis, value)) = location.iter().next() else {
            continue;
        };
        let points = axis_points.entry(axis).or_insert_with(|| vec![0.0]);
        if points.contains(&value) {
            return Err(Error::AmbiguousAxisPoint { axis, value });
        }
        points.push(value);
    }

    for points in axis_points.values_mut() {
        points.sort_by(f64::total_cmp);
    }
    Ok(axis_points)
}

fn check_duplicates(locations: &[Location]) -> Result<()> {
    for (second, location) in locations.iter().enumerate() {
        if let Some(first) = locations[..second].iter().position(|prev| prev == location) {
            return Err(Error::DuplicateLocation { first, second, location: location.clone() });
        }
    }
    Ok(())
}

/// Derive the support region of `location` given every master sorted before it.
fn compute_support(location: &Location, earlier: &[Location], axis_points: &AxisPoints) -> Region {
    let mut region = Region::new();
    for (axis, peak) in location.iter() {
        let points = axis_points.get(&axis).map_or(&[][..], Vec::as_slice);
        let lower = points.iter().copied().filter(|&v| v < peak).reduce(f64::max).unwrap_or(peak);
        let upper = points.iter().copied().filter(|&v| v > peak).reduce(f64::min).unwrap_or(peak);
        region.insert(axis, Tent::new(lower, peak, upper));
    }

    for master in earlier {
        // Masters on axes this location does not vary along cannot split it.
        if !master.is_subset_of(location) {
            continue;
        }
        let inside = region.iter().all(|(axis, tent)| {
            master.get(axis).is_none_or(|value| tent.lower < value && value < tent.upper)
        });
        if !inside {
            continue;
        }
        for (axis, value) in master.iter() {
            if let Some(tent) = region.get_mut(axis) {
                if value < tent.peak {
                    tent.lower = value;
                } else if tent.peak < value {
                    tent.upper = value;
                }
            }
        }
    }
    region
}

/// Canonical ordering key for a master location.
#[derive(Debug)]
struct SortKey {
    rank: usize,
    on_point_axes: usize,
    axis_priority: Vec<usize>,
    axes: Vec<Tag>,
    signs: Vec<i8>,
    magnitudes: Vec<f64>,
}

impl SortKey {
    fn new(location: &Location, axis_points: &AxisPoints, axis_order: &[Tag]) -> Self {
        let on_point_axes = location
            .iter()
            .filter(|(axis, value)| axis_points.get(axis).is_some_and(|points| points.contains(value)))
            .count();

        let mut ordered: IndexSet<Tag> =
            axis_order.iter().copied().filter(|&axis| location.contains(axis)).collect();
        ordered.extend(location.axes());
        let axes: Vec<Tag> = ordered.into_iter().collect();

        let axis_priority = axes
            .iter()
            .map(|axis| axis_order.iter().position(|known| known == axis).unwrap_or(usize::MAX))
            .collect();
        let values: Vec<f64> = axes.iter().map(|&axis| location.value(axis)).collect();
        let signs = values
            .iter()
            .map(|&value| match value.partial_cmp(&0.0) {
                Some(Ordering::Less) => -1,
                Some(Ordering::Greater) => 1,
                _ => 0,
            })
            .collect();
        let magnitudes = values.iter().map(|value| value.abs()).collect();

        Self { rank: location.rank(), on_point_axes, axis_priority, axes, signs, magnitudes }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| other.on_point_axes.cmp(&self.on_point_axes))
            .then_with(|| self.axis_priority.cmp(&other.axis_priority))
            .then_with(|| self.axes.cmp(&other.axes))
            .then_with(|| self.signs.cmp(&other.signs))
            .then_with(|| {
                self.magnitudes
                    .iter()
                    .zip(&other.magnitudes)
                    .map(|(a, b)| a.total_cmp(b))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or_else(|| self.magnitudes.len().cmp(&other.magnitudes.len()))
            })
    }
}
