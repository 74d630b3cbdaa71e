//! Labelled interval tables for numeric banding
//!
//! Age brackets, income brackets and risk categories all map a number onto a
//! fixed, ordered table of labelled intervals. [`BinClassifier`] is the single
//! implementation behind all three so that boundary inclusion is decided in one
//! place.

use std::ops::Bound;

use anyhow::{bail, Result};

/// Which end of an edge-derived interval is inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Closed {
    /// `[lower, upper)` - the default for age and income brackets
    #[default]
    Left,
    /// `(lower, upper]`
    Right,
}

/// A single labelled interval
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub label: String,
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
}

impl Band {
    pub fn new(label: impl Into<String>, lower: Bound<f64>, upper: Bound<f64>) -> Self {
        Self {
            label: label.into(),
            lower,
            upper,
        }
    }

    /// Check whether `value` falls inside this interval
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = match self.lower {
            Bound::Included(lower) => value >= lower,
            Bound::Excluded(lower) => value > lower,
            Bound::Unbounded => true,
        };
        let below_upper = match self.upper {
            Bound::Included(upper) => value <= upper,
            Bound::Excluded(upper) => value < upper,
            Bound::Unbounded => true,
        };
        above_lower && below_upper
    }
}

/// Maps numeric values onto an ordered table of labelled intervals.
///
/// Values that fall in no interval (and NaN) map to `None`, the missing-band
/// marker. When intervals overlap the first matching band wins.
#[derive(Debug, Clone, PartialEq)]
pub struct BinClassifier {
    bands: Vec<Band>,
}

impl BinClassifier {
    /// Build a classifier from ascending edges and one label per interval.
    ///
    /// # Arguments
    /// * `boundaries` - Strictly ascending, finite edges (at least two)
    /// * `labels` - Exactly `boundaries.len() - 1` labels
    /// * `closed` - Which end of every interval is inclusive
    pub fn from_edges(boundaries: &[f64], labels: &[&str], closed: Closed) -> Result<Self> {
        if boundaries.len() < 2 {
            bail!(
                "At least two bin boundaries are required, got {}",
                boundaries.len()
            );
        }
        if labels.len() != boundaries.len() - 1 {
            bail!(
                "Expected {} labels for {} boundaries, got {}",
                boundaries.len() - 1,
                boundaries.len(),
                labels.len()
            );
        }
        if boundaries.iter().any(|b| !b.is_finite()) {
            bail!("Bin boundaries must be finite numbers: {:?}", boundaries);
        }
        if boundaries.windows(2).any(|pair| pair[0] >= pair[1]) {
            bail!("Bin boundaries must be strictly ascending: {:?}", boundaries);
        }

        let bands = boundaries
            .windows(2)
            .zip(labels)
            .map(|(edges, label)| {
                let (lower, upper) = match closed {
                    Closed::Left => (Bound::Included(edges[0]), Bound::Excluded(edges[1])),
                    Closed::Right => (Bound::Excluded(edges[0]), Bound::Included(edges[1])),
                };
                Band::new(*label, lower, upper)
            })
            .collect();

        Ok(Self { bands })
    }

    /// Build a classifier from an explicit interval table, checked in order
    pub fn from_bands(bands: Vec<Band>) -> Self {
        Self { bands }
    }

    /// Label of the band containing `value`, or `None` when no band does
    pub fn classify(&self, value: f64) -> Option<&str> {
        if value.is_nan() {
            return None;
        }
        self.bands
            .iter()
            .find(|band| band.contains(value))
            .map(|band| band.label.as_str())
    }

    /// Like [`classify`](Self::classify), treating null input as out of range
    pub fn classify_opt(&self, value: Option<f64>) -> Option<&str> {
        value.and_then(|v| self.classify(v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|band| band.label.as_str())
    }
}
