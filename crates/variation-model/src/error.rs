//! Error types for variation model construction.

use std::result;

use font_types::Tag;
use thiserror::Error;

use crate::location::Location;

/// Result type for variation model operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while building or applying a variation model.
#[derive(Debug, Error)]
pub enum Error {
    /// No master sits at the default location.
    #[error("base master not found: no location is at the default of every axis")]
    MissingBase,

    /// Two masters resolve to the same location once default axes are dropped.
    #[error("masters {first} and {second} share the location {location}")]
    DuplicateLocation {
        first: usize,
        second: usize,
        location: Location,
    },

    /// Two single-axis masters sit at the same point of one axis.
    #[error("more than one on-axis master for '{axis}' at {value}")]
    AmbiguousAxisPoint { axis: Tag, value: f64 },

    /// A per-master value list does not line up with the model's masters.
    #[error("expected {expected} values, one per master, got {actual}")]
    MasterCountMismatch { expected: usize, actual: usize },
}
