//! # Variation Model
//!
//! Turn a sparse set of master locations into a piecewise-linear interpolation
//! basis.
//!
//! Given the normalized location of every master, [`VariationModel`] sorts the
//! masters into a canonical order, derives the support [`Region`] over which each
//! master contributes, and computes the weights that reduce raw master values to
//! additive deltas.
//!
//! ## Example
//!
//! ```
//! use font_types::Tag;
//! use varlib_variation_model::{Location, VariationModel};
//!
//! let wght = Tag::new(b"wght");
//! let locations = [
//!     Location::new(),
//!     Location::new().with(wght, 1.0),
//!     Location::new().with(wght, -1.0),
//! ];
//! let model = VariationModel::new(&locations, &[wght]).unwrap();
//!
//! // Regular = 400, Bold = 700, Light = 300
//! let deltas = model.get_deltas(&[400.0, 700.0, 300.0]).unwrap();
//! assert_eq!(deltas, vec![400.0, -100.0, 300.0]);
//!
//! let semibold = Location::new().with(wght, 0.5);
//! assert_eq!(model.interpolate_from_deltas(&semibold, &deltas).unwrap(), 550.0);
//! ```

mod error;
mod location;
mod model;
mod region;

pub use error::{Error, Result};
pub use location::Location;
pub use model::{AxisPoints, VariationModel};
pub use region::{Region, Tent};
