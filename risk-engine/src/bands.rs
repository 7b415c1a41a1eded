//! Band table lookup
//!
//! Every scoring and labelling table in the engine is an ordered list of
//! thresholds. A lookup walks the list and returns the value of the first band
//! whose threshold matches; when nothing matches (including infinite or NaN
//! inputs) the table's open-ended value is returned.

/// One row of a band table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<T> {
    /// Threshold compared against the looked-up value
    pub threshold: f64,
    /// Value returned when this band matches
    pub value: T,
}

/// Comparison applied between the looked-up value and a band threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Matches when `value < threshold` (ascending tables, exclusive bound)
    Below,
    /// Matches when `value <= threshold` (inclusive label ranges)
    AtMost,
    /// Matches when `value > threshold` (descending tables)
    Above,
}

impl Boundary {
    fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            Boundary::Below => value < threshold,
            Boundary::AtMost => value <= threshold,
            Boundary::Above => value > threshold,
        }
    }
}

/// Ordered thresholds plus the open-ended band
#[derive(Debug, Clone, Copy)]
pub struct BandTable<T: 'static> {
    bands: &'static [Band<T>],
    otherwise: T,
    boundary: Boundary,
}

impl<T: Copy + 'static> BandTable<T> {
    /// Create a table; `otherwise` is the open-ended last band
    pub const fn new(bands: &'static [Band<T>], otherwise: T, boundary: Boundary) -> Self {
        Self {
            bands,
            otherwise,
            boundary,
        }
    }

    /// Value of the first matching band, or the open-ended band if none match
    pub fn lookup(&self, value: f64) -> T {
        self.bands
            .iter()
            .find(|band| self.boundary.matches(value, band.threshold))
            .map_or(self.otherwise, |band| band.value)
    }

    /// Comparison direction of this table
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }
}
