//! Error types for glyph delta computation.

use std::result;

use thiserror::Error;

/// Result type for glyph delta operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that abort delta computation.
///
/// Problems confined to a single glyph are not errors; they are reported as
/// [`Warning`](crate::Warning)s and the glyph is skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// The master locations do not form a valid variation model.
    #[error("Invalid variation model: {0}")]
    Model(#[from] varlib_variation_model::Error),

    /// Font read error.
    #[error("Font read error: {0}")]
    ReadError(#[from] read_fonts::ReadError),

    /// Invalid designspace configuration.
    #[error("Invalid designspace: {0}")]
    InvalidDesignspace(String),

    /// No master found at the default location.
    #[error("No master at default location found in designspace")]
    NoDefaultSource,

    /// An axis name that is neither a standard axis nor a usable tag.
    #[error("Axis '{0}' has no registered tag and is not a valid tag itself")]
    InvalidAxisTag(String),

    /// The sample source and the model disagree on the number of masters.
    #[error("Sample source has {actual} masters, variation model has {expected}")]
    MasterCountMismatch { expected: usize, actual: usize },
}
