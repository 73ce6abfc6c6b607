//! Per-master glyph samples.
//!
//! A sample is the list of points whose movement between masters becomes a
//! glyph's deltas: outline points for simple glyphs, component offsets for
//! composites, then the phantom points carrying the glyph metrics.

use std::collections::BTreeMap;

use kurbo::Point;
use read_fonts::{
    FontRef, TableProvider,
    tables::{
        glyf::{Anchor, Glyf, Glyph},
        hmtx::Hmtx,
        loca::Loca,
    },
    types::GlyphId,
};

use crate::error::Result;

/// Source of per-master samples for every glyph.
pub trait SampleSource: Sync {
    /// Number of masters, in designspace order.
    fn master_count(&self) -> usize;

    /// Every glyph id with samples in at least one master, ascending.
    fn glyph_ids(&self) -> Vec<GlyphId>;

    /// Samples of `glyph` in `master`, or `None` if the master lacks the glyph.
    fn samples(&self, master: usize, glyph: GlyphId) -> Result<Option<Vec<Point>>>;
}

struct MasterTables<'a> {
    glyf: Glyf<'a>,
    loca: Loca<'a>,
    hmtx: Hmtx<'a>,
    num_glyphs: u32,
}

/// Samples read from the `glyf` and `hmtx` tables of binary master fonts.
pub struct GlyfSamples<'a> {
    masters: Vec<MasterTables<'a>>,
}

impl<'a> GlyfSamples<'a> {
    /// Load the glyph tables of every master font.
    pub fn new(fonts: &[FontRef<'a>]) -> Result<Self> {
        let masters = fonts
            .iter()
            .map(|font| {
                Ok(MasterTables {
                    glyf: font.glyf()?,
                    loca: font.loca(None)?,
                    hmtx: font.hmtx()?,
                    num_glyphs: u32::from(font.maxp()?.num_glyphs()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { masters })
    }
}

impl SampleSource for GlyfSamples<'_> {
    fn master_count(&self) -> usize {
        self.masters.len()
    }

    fn glyph_ids(&self) -> Vec<GlyphId> {
        let num_glyphs = self.masters.iter().map(|m| m.num_glyphs).max().unwrap_or(0);
        (0..num_glyphs).map(GlyphId::new).collect()
    }

    fn samples(&self, master: usize, glyph: GlyphId) -> Result<Option<Vec<Point>>> {
        let Some(tables) = self.masters.get(master) else {
            return Ok(None);
        };
        if glyph.to_u32() >= tables.num_glyphs {
            return Ok(None);
        }

        let (mut points, x_min, y_min, y_max) = match tables.loca.get_glyf(glyph, &tables.glyf)? {
            Some(Glyph::Simple(simple)) => (
                simple
                    .points()
                    .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                    .collect::<Vec<_>>(),
                simple.x_min(),
                simple.y_min(),
                simple.y_max(),
            ),
            Some(Glyph::Composite(composite)) => (
                composite
                    .components()
                    .map(|c| match c.anchor {
                        Anchor::Offset { x, y } => Point::new(f64::from(x), f64::from(y)),
                        // Point-matched components move with their anchors.
                        Anchor::Point { .. } => Point::ZERO,
                    })
                    .collect(),
                composite.x_min(),
                composite.y_min(),
                composite.y_max(),
            ),
            None => (Vec::new(), 0, 0, 0),
        };

        let advance = f64::from(tables.hmtx.advance(glyph).unwrap_or(0));
        let lsb = f64::from(tables.hmtx.side_bearing(glyph).unwrap_or(0));
        let left = f64::from(x_min) - lsb;
        points.extend([
            Point::new(left, 0.0),
            Point::new(left + advance, 0.0),
            Point::new(0.0, f64::from(y_max)),
            // yMin itself, not -yMin: both vertical points are glyph coordinates.
            Point::new(0.0, f64::from(y_min)),
        ]);
        Ok(Some(points))
    }
}

/// In-memory samples, keyed by glyph id.
#[derive(Debug, Clone, Default)]
pub struct MemorySamples {
    master_count: usize,
    glyphs: BTreeMap<GlyphId, Vec<Option<Vec<Point>>>>,
}

impl MemorySamples {
    pub fn new(master_count: usize) -> Self {
        Self {
            master_count,
            glyphs: BTreeMap::new(),
        }
    }

    /// Set the samples of `glyph` in `master`.
    ///
    /// Masters without samples for a glyph report it as missing.
    pub fn insert(&mut self, glyph: GlyphId, master: usize, points: Vec<Point>) {
        let masters = self
            .glyphs
            .entry(glyph)
            .or_insert_with(|| vec![None; self.master_count]);
        if let Some(slot) = masters.get_mut(master) {
            *slot = Some(points);
        }
    }

    /// Add `glyph` with samples for every master, in master order.
    pub fn with_glyph(mut self, glyph: GlyphId, masters: Vec<Vec<Point>>) -> Self {
        for (master, points) in masters.into_iter().enumerate() {
            self.insert(glyph, master, points);
        }
        self
    }
}

impl SampleSource for MemorySamples {
    fn master_count(&self) -> usize {
        self.master_count
    }

    fn glyph_ids(&self) -> Vec<GlyphId> {
        self.glyphs.keys().copied().collect()
    }

    fn samples(&self, master: usize, glyph: GlyphId) -> Result<Option<Vec<Point>>> {
        Ok(self
            .glyphs
            .get(&glyph)
            .and_then(|masters| masters.get(master))
            .cloned()
            .flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PHANTOM_POINT_COUNT;

    #[test]
    fn glyf_samples_append_phantom_points() {
        let font = FontRef::new(font_test_data::VAZIRMATN_VAR).unwrap();
        let source = GlyfSamples::new(&[font.clone()]).unwrap();

        let gid = GlyphId::new(1);
        let glyf = font.glyf().unwrap();
        let loca = font.loca(None).unwrap();
        let Some(Glyph::Simple(simple)) = loca.get_glyf(gid, &glyf).unwrap() else {
            panic!("glyph 1 should be a simple glyph");
        };

        let samples = source.samples(0, gid).unwrap().unwrap();
        assert_eq!(samples.len(), simple.num_points() + PHANTOM_POINT_COUNT);

        let first = simple.points().next().unwrap();
        assert_eq!(samples[0], Point::new(f64::from(first.x), f64::from(first.y)));

        let hmtx = font.hmtx().unwrap();
        let advance = f64::from(hmtx.advance(gid).unwrap());
        let phantom = &samples[simple.num_points()..];
        assert_eq!(phantom[1].x - phantom[0].x, advance);
        assert_eq!(phantom[2], Point::new(0.0, f64::from(simple.y_max())));
        assert_eq!(phantom[3], Point::new(0.0, f64::from(simple.y_min())));
    }

    #[test]
    fn glyf_samples_out_of_range_glyph_is_absent() {
        let font = FontRef::new(font_test_data::VAZIRMATN_VAR).unwrap();
        let num_glyphs = u32::from(font.maxp().unwrap().num_glyphs());
        let source = GlyfSamples::new(&[font]).unwrap();

        assert_eq!(source.glyph_ids().len(), num_glyphs as usize);
        assert!(source.samples(0, GlyphId::new(num_glyphs)).unwrap().is_none());
        assert!(source.samples(1, GlyphId::new(1)).unwrap().is_none());
    }

    #[test]
    fn memory_samples_report_missing_masters() {
        let gid = GlyphId::new(3);
        let mut source = MemorySamples::new(2);
        source.insert(gid, 1, vec![Point::new(1.0, 2.0)]);

        assert_eq!(source.glyph_ids(), vec![gid]);
        assert!(source.samples(0, gid).unwrap().is_none());
        assert_eq!(source.samples(1, gid).unwrap(), Some(vec![Point::new(1.0, 2.0)]));
        assert!(source.samples(0, GlyphId::new(4)).unwrap().is_none());
    }
}
