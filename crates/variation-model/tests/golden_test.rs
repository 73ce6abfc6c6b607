//! Model tests against the reference master layout from fontTools' varLib doctest.

use font_types::Tag;
use kurbo::Vec2;
use varlib_variation_model::{Location, Tent, VariationModel};

const WGHT: Tag = Tag::new(b"wght");
const WDTH: Tag = Tag::new(b"wdth");

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn loc(wght: f64, wdth: f64) -> Location {
    Location::from([(WGHT, wght), (WDTH, wdth)])
}

/// Nine masters over weight and width, base at index 6.
fn reference_locations() -> Vec<Location> {
    vec![
        loc(100.0, 0.0),
        loc(-100.0, 0.0),
        loc(-180.0, 0.0),
        loc(0.0, 0.3),
        loc(120.0, 0.3),
        loc(120.0, 0.2),
        loc(0.0, 0.0),
        loc(180.0, 0.3),
        loc(180.0, 0.0),
    ]
}

fn reference_model() -> VariationModel {
    init_logging();
    VariationModel::new(&reference_locations(), &[WGHT]).unwrap()
}

fn assert_weights(model: &VariationModel, original: usize, expected: &[(usize, f64)]) {
    let weights = model.delta_weights(original);
    assert_eq!(
        weights.len(),
        expected.len(),
        "master {original}: expected {expected:?}, got {weights:?}"
    );
    for &(prev, weight) in expected {
        let actual = weights
            .get(&prev)
            .unwrap_or_else(|| panic!("master {original} has no weight for {prev}: {weights:?}"));
        assert!(
            (actual - weight).abs() < 1e-12,
            "master {original}, weight of {prev}: expected {weight}, got {actual}"
        );
    }
}

#[test]
fn canonical_order() {
    let model = reference_model();

    assert_eq!(
        model.canonical_order(),
        &[
            loc(0.0, 0.0),
            loc(-100.0, 0.0),
            loc(-180.0, 0.0),
            loc(100.0, 0.0),
            loc(180.0, 0.0),
            loc(0.0, 0.3),
            loc(180.0, 0.3),
            loc(120.0, 0.3),
            loc(120.0, 0.2),
        ]
    );
    assert_eq!(model.mapping(), &[6, 1, 2, 0, 8, 3, 7, 4, 5]);
    assert_eq!(model.reverse_mapping(), &[3, 1, 2, 5, 7, 8, 0, 6, 4]);
}

#[test]
fn supports() {
    let model = reference_model();

    let wght = |original: usize| model.support(original).get(WGHT).copied();
    let wdth = |original: usize| model.support(original).get(WDTH).copied();

    assert_eq!(wght(0), Some(Tent::new(0.0, 100.0, 180.0)));
    assert_eq!(wght(1), Some(Tent::new(-180.0, -100.0, 0.0)));
    assert_eq!(wght(2), Some(Tent::new(-180.0, -180.0, -100.0)));
    assert_eq!(wght(3), None);
    assert_eq!(wdth(3), Some(Tent::new(0.0, 0.3, 0.3)));
    assert_eq!(wght(4), Some(Tent::new(100.0, 120.0, 180.0)));
    assert_eq!(wdth(4), Some(Tent::new(0.0, 0.3, 0.3)));
    assert_eq!(wght(5), Some(Tent::new(100.0, 120.0, 180.0)));
    assert_eq!(wdth(5), Some(Tent::new(0.0, 0.2, 0.3)));
    assert!(model.support(6).is_empty());
    assert_eq!(wght(7), Some(Tent::new(100.0, 180.0, 180.0)));
    assert_eq!(wdth(7), Some(Tent::new(0.0, 0.3, 0.3)));
    assert_eq!(wght(8), Some(Tent::new(100.0, 180.0, 180.0)));
    assert_eq!(wdth(8), None);
}

#[test]
fn delta_weights() {
    let model = reference_model();

    assert_weights(&model, 0, &[(6, -1.0)]);
    assert_weights(&model, 1, &[(6, -1.0)]);
    assert_weights(&model, 2, &[(6, -1.0)]);
    assert_weights(&model, 3, &[(6, -1.0)]);
    assert_weights(&model, 4, &[(0, -0.25), (3, -1.0), (6, -1.0), (7, -0.75), (8, -0.75)]);
    assert_weights(
        &model,
        5,
        &[
            (0, -0.25),
            (3, -1.0 / 3.0),
            (4, -1.0 / 3.0),
            (6, -1.0),
            (7, -0.25),
            (8, -0.75),
        ],
    );
    assert_weights(&model, 6, &[]);
    assert_weights(&model, 7, &[(3, -1.0), (6, -1.0), (8, -1.0)]);
    assert_weights(&model, 8, &[(6, -1.0)]);
}

#[test]
fn delta_weights_iterate_in_canonical_order() {
    let model = reference_model();
    let keys: Vec<usize> = model.delta_weights(5).keys().copied().collect();
    assert_eq!(keys, vec![6, 0, 8, 3, 7, 4]);
}

#[test]
fn base_listed_first_regardless_of_input_position() {
    let mut locations = reference_locations();
    let base = locations.remove(6);
    locations.insert(0, base);

    let model = VariationModel::new(&locations, &[WGHT]).unwrap();
    assert_eq!(model.base_index(), 0);
    assert_eq!(model.mapping(), &[0, 2, 3, 1, 8, 4, 7, 5, 6]);
    assert_weights(&model, 5, &[(0, -1.0), (1, -0.25), (4, -1.0), (7, -0.75), (8, -0.75)]);
}

#[test]
fn sparse_weights_match_dense_matrix() {
    let model = reference_model();
    let n = model.len();

    let mut dense = vec![vec![0.0; n]; n];
    for (original, row) in dense.iter_mut().enumerate() {
        row[original] = 1.0;
        for (&prev, &weight) in model.delta_weights(original) {
            row[prev] = weight;
        }
    }

    let values: Vec<f64> = (0..n).map(|i| (i * i) as f64 + 0.5).collect();
    let deltas = model.get_deltas(&values).unwrap();

    // Walk canonical order so earlier deltas are known before they are used.
    let mut dense_deltas = vec![0.0; n];
    for &original in model.mapping() {
        dense_deltas[original] = (0..n)
            .filter(|&prev| prev != original)
            .map(|prev| dense[original][prev] * dense_deltas[prev])
            .fold(values[original], |acc, contribution| acc + contribution);
    }

    for (canonical, delta) in deltas.iter().enumerate() {
        let original = model.to_original(canonical);
        assert!((delta - dense_deltas[original]).abs() < 1e-9);
    }
}

#[test]
fn constant_samples_reconstruct_exactly() {
    let model = reference_model();
    let values = vec![Vec2::new(250.0, -40.0); model.len()];

    let deltas = model.get_deltas(&values).unwrap();
    assert_eq!(deltas[0], Vec2::new(250.0, -40.0));
    assert!(deltas[1..].iter().all(|delta| *delta == Vec2::ZERO));
    assert_eq!(model.reconstruct(&deltas).unwrap(), values);
}

#[test]
fn deltas_round_trip() {
    let model = reference_model();
    let values: Vec<Vec2> = (0..model.len())
        .map(|i| Vec2::new(10.0 * i as f64 - 3.25, (i as f64).sqrt() * 7.0))
        .collect();

    let deltas = model.get_deltas(&values).unwrap();
    let rebuilt = model.reconstruct(&deltas).unwrap();

    for (expected, actual) in values.iter().zip(&rebuilt) {
        assert!((*expected - *actual).hypot() < 1e-9, "{expected:?} != {actual:?}");
    }
}

#[test]
fn interpolation_hits_every_master() {
    let model = reference_model();
    let values: Vec<f64> = (0..model.len()).map(|i| 100.0 + 17.0 * i as f64).collect();
    let deltas = model.get_deltas(&values).unwrap();

    for (location, expected) in model.locations().iter().zip(&values) {
        let actual = model.interpolate_from_deltas(location, &deltas).unwrap();
        assert!((actual - expected).abs() < 1e-9, "at {location}: {actual} != {expected}");
    }
}

#[test]
fn later_supports_vanish_at_earlier_masters() {
    let model = reference_model();
    let order = model.canonical_order();

    for (earlier, location) in order.iter().enumerate() {
        for later in earlier + 1..order.len() {
            let support = model.support(model.to_original(later));
            assert_eq!(
                support.scalar_at(location),
                0.0,
                "support of #{later} reaches into #{earlier} at {location}"
            );
        }
    }
}

#[test]
fn later_supports_stay_inside_sharing_masters() {
    let model = reference_model();
    let order = model.canonical_order();

    for (later, location) in order.iter().enumerate() {
        let support = model.support(model.to_original(later));
        for master in &order[..later] {
            if !master.is_subset_of(location) {
                continue;
            }
            // An earlier master on the same axes never sits strictly inside
            // the later box on an axis where it differs from the later peak.
            let strictly_inside = master.iter().all(|(axis, value)| {
                let tent = support.get(axis).unwrap();
                tent.lower < value && value < tent.upper && value != tent.peak
            });
            assert!(!strictly_inside || master.is_default(), "{master} inside support of {location}");
        }
    }
}
