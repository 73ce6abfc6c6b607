//! # Glyph Deltas
//!
//! Compute per-glyph point deltas from static master fonts.
//!
//! Masters are placed in a [`DesignSpace`], whose normalized locations feed a
//! [`VariationModel`](varlib_variation_model::VariationModel). Every glyph's
//! outline points, component offsets and phantom points are then reduced to
//! one set of deltas per non-base master, each tied to that master's support
//! region.
//!
//! ## Example
//!
//! ```no_run
//! use read_fonts::FontRef;
//! use varlib_glyph_deltas::{DesignSpace, Master, Options, build_glyph_deltas};
//!
//! let regular = std::fs::read("Regular.ttf").unwrap();
//! let bold = std::fs::read("Bold.ttf").unwrap();
//!
//! let designspace = DesignSpace::from_masters(
//!     vec![
//!         Master::new("Regular", "Regular.ttf", [("weight", 400.0)]),
//!         Master::new("Bold", "Bold.ttf", [("weight", 700.0)]),
//!     ],
//!     0,
//! )
//! .unwrap();
//! let fonts = [FontRef::new(&regular).unwrap(), FontRef::new(&bold).unwrap()];
//!
//! let (store, report) = build_glyph_deltas(&designspace, &fonts, Options::new()).unwrap();
//! println!("{} glyphs, {} skipped", store.len(), report.skipped);
//! ```

mod builder;
mod config;
mod designspace;
mod error;
mod options;
mod samples;
mod sink;

pub use builder::{BuildReport, DeltaBuilder, RecordOutcome, Warning, build_glyph_deltas};
pub use config::{PHANTOM_POINT_COUNT, STANDARD_AXES};
pub use designspace::{Axis, DesignSpace, Master};
pub use error::{Error, Result};
pub use options::Options;
pub use samples::{GlyfSamples, MemorySamples, SampleSource};
pub use sink::{DeltaSink, GlyphVariation, VariationStore};
