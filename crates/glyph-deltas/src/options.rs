//! Options for glyph delta computation

/// Options for glyph delta computation
#[derive(Debug, Clone)]
pub struct Options {
    /// Compute glyphs on the rayon thread pool
    pub parallel: bool,

    /// Round every delta to the nearest integer unit
    pub round_deltas: bool,

    /// Omit variations whose deltas are all zero
    pub drop_zero_deltas: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parallel: true,
            round_deltas: false,
            drop_zero_deltas: true,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn round_deltas(mut self, round_deltas: bool) -> Self {
        self.round_deltas = round_deltas;
        self
    }

    pub fn drop_zero_deltas(mut self, drop_zero_deltas: bool) -> Self {
        self.drop_zero_deltas = drop_zero_deltas;
        self
    }
}
