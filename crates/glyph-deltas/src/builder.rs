//! Per-glyph delta computation.

use std::time::Instant;

use kurbo::Vec2;
use log::{debug, info, warn};
use rayon::prelude::*;
use read_fonts::{FontRef, types::GlyphId};
use varlib_variation_model::VariationModel;

use crate::{
    designspace::DesignSpace,
    error::{Error, Result},
    options::Options,
    samples::{GlyfSamples, SampleSource},
    sink::{DeltaSink, GlyphVariation, VariationStore},
};

/// Reasons a glyph is left without variations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Warning {
    /// The base master has the glyph and this one does not.
    #[error("Glyph {glyph_id} is missing in master {master}, skipping")]
    MissingInMaster { glyph_id: u32, master: usize },

    /// A master's samples do not line up with the base master's.
    #[error(
        "Point count mismatch for glyph {glyph_id}: master {master} has {actual} points, expected {expected}, skipping"
    )]
    PointCountMismatch {
        glyph_id: u32,
        master: usize,
        expected: usize,
        actual: usize,
    },
}

/// What became of one glyph.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Variations of every non-base master, in canonical order.
    Variations(Vec<GlyphVariation>),
    /// The base master does not have the glyph.
    Absent,
    /// The glyph's masters are incompatible.
    Skipped(Warning),
}

/// Summary of a build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Glyphs written to the sink
    pub written: usize,
    /// Glyphs skipped as incompatible
    pub skipped: usize,
    pub warnings: Vec<Warning>,
}

/// Computes glyph deltas for every glyph of a sample source.
pub struct DeltaBuilder<'m> {
    model: &'m VariationModel,
    options: Options,
}

impl<'m> DeltaBuilder<'m> {
    pub fn new(model: &'m VariationModel, options: Options) -> Self {
        Self { model, options }
    }

    /// Compute the variations of a single glyph.
    pub fn compute_glyph<S>(&self, source: &S, glyph: GlyphId) -> Result<RecordOutcome>
    where
        S: SampleSource + ?Sized,
    {
        let glyph_id = glyph.to_u32();
        let masters = (0..self.model.len())
            .map(|master| source.samples(master, glyph))
            .collect::<Result<Vec<_>>>()?;

        let base = self.model.base_index();
        if masters[base].is_none() {
            return Ok(RecordOutcome::Absent);
        }
        if let Some(master) = masters.iter().position(Option::is_none) {
            return Ok(RecordOutcome::Skipped(Warning::MissingInMaster { glyph_id, master }));
        }
        let masters: Vec<_> = masters.into_iter().flatten().collect();

        let expected = masters[base].len();
        if let Some((master, points)) = masters
            .iter()
            .enumerate()
            .find(|(_, points)| points.len() != expected)
        {
            return Ok(RecordOutcome::Skipped(Warning::PointCountMismatch {
                glyph_id,
                master,
                expected,
                actual: points.len(),
            }));
        }

        // per_master[canonical][point]
        let mut per_master: Vec<Vec<Vec2>> = vec![Vec::with_capacity(expected); masters.len()];
        let mut point_values: Vec<Vec2> = vec![Vec2::ZERO; masters.len()];
        for point_idx in 0..expected {
            for (value, points) in point_values.iter_mut().zip(&masters) {
                *value = points[point_idx].to_vec2();
            }
            let deltas = self.model.get_deltas(&point_values)?;
            for (deltas_of_master, delta) in per_master.iter_mut().zip(deltas) {
                let delta = if self.options.round_deltas { delta.round() } else { delta };
                deltas_of_master.push(delta);
            }
        }

        let variations: Vec<GlyphVariation> = per_master
            .into_iter()
            .enumerate()
            .skip(1)
            .map(|(canonical, deltas)| {
                let region = self.model.support(self.model.to_original(canonical)).clone();
                GlyphVariation::new(region, deltas)
            })
            .filter(|variation| !(self.options.drop_zero_deltas && variation.is_zero()))
            .collect();
        debug!("Glyph {glyph_id}: {} variations over {expected} points", variations.len());

        Ok(RecordOutcome::Variations(variations))
    }

    /// Compute every glyph of `source` and write the results to `sink` in glyph order.
    ///
    /// Incompatible glyphs are skipped with a warning. Glyphs the base master
    /// does not have are not written.
    pub fn build<S, K>(&self, source: &S, sink: &mut K) -> Result<BuildReport>
    where
        S: SampleSource + ?Sized,
        K: DeltaSink + ?Sized,
    {
        if source.master_count() != self.model.len() {
            return Err(Error::MasterCountMismatch {
                expected: self.model.len(),
                actual: source.master_count(),
            });
        }

        let glyphs = source.glyph_ids();
        let start = Instant::now();
        let compute = |&glyph: &GlyphId| self.compute_glyph(source, glyph).map(|outcome| (glyph, outcome));
        let outcomes = if self.options.parallel {
            glyphs.par_iter().map(compute).collect::<Result<Vec<_>>>()?
        } else {
            glyphs.iter().map(compute).collect::<Result<Vec<_>>>()?
        };
        let elapsed = start.elapsed().as_secs_f64();

        let mut report = BuildReport::default();
        for (glyph, outcome) in outcomes {
            match outcome {
                RecordOutcome::Variations(variations) => {
                    sink.write_record(glyph, variations)?;
                    report.written += 1;
                }
                RecordOutcome::Absent => {}
                RecordOutcome::Skipped(warning) => {
                    warn!("{warning}");
                    report.skipped += 1;
                    report.warnings.push(warning);
                }
            }
        }

        info!(
            "Glyph deltas computed in {elapsed:.2}s ({} glyphs, {} written, {} skipped)",
            glyphs.len(),
            report.written,
            report.skipped
        );
        Ok(report)
    }
}

/// Compute glyph deltas for binary master fonts placed in `designspace`.
///
/// `fonts` are the masters' fonts in designspace master order.
pub fn build_glyph_deltas(
    designspace: &DesignSpace,
    fonts: &[FontRef],
    options: Options,
) -> Result<(VariationStore, BuildReport)> {
    if fonts.len() != designspace.masters.len() {
        return Err(Error::MasterCountMismatch {
            expected: designspace.masters.len(),
            actual: fonts.len(),
        });
    }

    let model = designspace.build_model()?;
    info!(
        "Building glyph deltas for {} masters over {} axes",
        model.len(),
        designspace.axes.len()
    );

    let source = GlyfSamples::new(fonts)?;
    let mut store = VariationStore::new();
    let report = DeltaBuilder::new(&model, options).build(&source, &mut store)?;
    Ok((store, report))
}
