//! Destinations for computed glyph variations.

use indexmap::IndexMap;
use kurbo::Vec2;
use read_fonts::types::GlyphId;
use varlib_variation_model::Region;

use crate::error::Result;

/// The deltas one master contributes to a glyph, with the region they apply over.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphVariation {
    pub region: Region,
    /// One delta per sample point, phantom points included
    pub deltas: Vec<Vec2>,
}

impl GlyphVariation {
    pub fn new(region: Region, deltas: Vec<Vec2>) -> Self {
        Self { region, deltas }
    }

    /// True if no point moves.
    pub fn is_zero(&self) -> bool {
        self.deltas.iter().all(|delta| *delta == Vec2::ZERO)
    }
}

/// Receives glyph variations in ascending glyph order.
pub trait DeltaSink {
    fn write_record(&mut self, glyph: GlyphId, variations: Vec<GlyphVariation>) -> Result<()>;
}

/// Collects glyph variations in memory.
#[derive(Debug, Clone, Default)]
pub struct VariationStore {
    records: IndexMap<GlyphId, Vec<GlyphVariation>>,
}

impl VariationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variations of `glyph`, if it was written.
    pub fn get(&self, glyph: GlyphId) -> Option<&[GlyphVariation]> {
        self.records.get(&glyph).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, &[GlyphVariation])> + '_ {
        self.records
            .iter()
            .map(|(glyph, variations)| (*glyph, variations.as_slice()))
    }
}

impl DeltaSink for VariationStore {
    fn write_record(&mut self, glyph: GlyphId, variations: Vec<GlyphVariation>) -> Result<()> {
        self.records.insert(glyph, variations);
        Ok(())
    }
}
