//! Fixed-width 1D histogram accumulator with under/overflow and running moments.
//!
//! Bins are `[lower + i*w, lower + (i+1)*w)` with `w = (upper - lower) / bins`;
//! `value < lower` goes to underflow and `value >= upper` to overflow.
//!
//! Non-finite input policy:
//! - NaN values and non-finite weights are rejected: only `rejected()` moves.
//! - `±inf` values are counted in underflow/overflow but kept out of the
//!   moment sums, so `mean()`/`variance()` stay finite.
//! - A finite fill whose moment sums would overflow to a non-finite value is
//!   rejected as a whole.
//!
//! All state is plain summable counters; [`Histogram::merge`] adds two
//! accumulators with identical geometry pointwise.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weighted frequency counter over a scalar stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    n_bins: usize,
    lower: f64,
    upper: f64,
    bin_content: Vec<f64>,
    bin_sumw2: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: u64,
    rejected: u64,
    sumw: f64,
    sumwx: f64,
    sumwx2: f64,
}

impl Histogram {
    /// Create an empty histogram over `[lower, upper)` with `bins` equal bins.
    pub fn new(bins: usize, lower: f64, upper: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::Config("histogram needs at least one bin".into()));
        }
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(Error::Config(format!(
                "invalid histogram range [{lower}, {upper}): need finite lower < upper"
            )));
        }
        let width = (upper - lower) / bins as f64;
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::Config(format!(
                "invalid histogram range [{lower}, {upper}) with {bins} bins: bin width {width} is not representable"
            )));
        }
        Ok(Self {
            n_bins: bins,
            lower,
            upper,
            bin_content: vec![0.0; bins],
            bin_sumw2: vec![0.0; bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
            rejected: 0,
            sumw: 0.0,
            sumwx: 0.0,
            sumwx2: 0.0,
        })
    }

    /// Add `value` with `weight`. Negative weights are accepted.
    pub fn fill(&mut self, value: f64, weight: f64) {
        if value.is_nan() || !weight.is_finite() {
            self.rejected += 1;
            return;
        }
        let moments = if value.is_finite() {
            let wx = weight * value;
            let sums = (self.sumw + weight, self.sumwx + wx, self.sumwx2 + wx * value);
            if !(sums.0.is_finite() && sums.1.is_finite() && sums.2.is_finite()) {
                self.rejected += 1;
                return;
            }
            Some(sums)
        } else {
            None
        };
        self.entries += 1;

        if value < self.lower {
            self.underflow += weight;
        } else if value >= self.upper {
            self.overflow += weight;
        } else if let Some(bin) = self.find_bin(value) {
            self.bin_content[bin] += weight;
            self.bin_sumw2[bin] += weight * weight;
        }

        if let Some((sumw, sumwx, sumwx2)) = moments {
            self.sumw = sumw;
            self.sumwx = sumwx;
            self.sumwx2 = sumwx2;
        }
    }

    /// In-range bin index for `value`, `None` outside `[lower, upper)`.
    ///
    /// The index is clamped to the last bin so that values just below `upper`
    /// never round onto a nonexistent bin.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if !(value >= self.lower && value < self.upper) {
            return None;
        }
        let idx = ((value - self.lower) / self.bin_width()).floor() as usize;
        Some(idx.min(self.n_bins - 1))
    }

    /// Add `other` into `self` pointwise. Geometries must be identical.
    pub fn merge(&mut self, other: &Histogram) -> Result<()> {
        if self.n_bins != other.n_bins || self.lower != other.lower || self.upper != other.upper {
            return Err(Error::Config(format!(
                "cannot merge histograms with different binning: ({}, {}, {}) vs ({}, {}, {})",
                self.n_bins, self.lower, self.upper, other.n_bins, other.lower, other.upper
            )));
        }
        for (a, b) in self.bin_content.iter_mut().zip(&other.bin_content) {
            *a += b;
        }
        for (a, b) in self.bin_sumw2.iter_mut().zip(&other.bin_sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        self.rejected += other.rejected;
        self.sumw += other.sumw;
        self.sumwx += other.sumwx;
        self.sumwx2 += other.sumwx2;
        Ok(())
    }

    /// Weighted mean of all finite filled values; `None` with no weight.
    pub fn mean(&self) -> Option<f64> {
        if self.sumw == 0.0 {
            return None;
        }
        Some(self.sumwx / self.sumw)
    }

    /// Weighted population variance; `None` with no weight.
    ///
    /// Small negative results from cancellation are clamped to zero; a NaN
    /// (sums overflowed by [`Histogram::merge`]) is passed through.
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var = self.sumwx2 / self.sumw - mean * mean;
        Some(if var < 0.0 { 0.0 } else { var })
    }

    /// Square root of [`Histogram::variance`].
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Sum of weights in bin `i`; `None` for `i >= bins`.
    pub fn bin_content(&self, i: usize) -> Option<f64> {
        self.bin_content.get(i).copied()
    }

    /// Sum of squared weights in bin `i`.
    pub fn bin_sumw2(&self, i: usize) -> Option<f64> {
        self.bin_sumw2.get(i).copied()
    }

    /// All bin contents.
    pub fn contents(&self) -> &[f64] {
        &self.bin_content
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Accepted fills, in range or not.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Fills refused by the non-finite policy.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.n_bins as f64
    }

    /// Bin edges, `bins + 1` values from `lower` to `upper`.
    pub fn bin_edges(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..=self.n_bins)
            .map(|i| if i == self.n_bins { self.upper } else { self.lower + i as f64 * w })
            .collect()
    }

    /// Center of bin `i`.
    pub fn bin_center(&self, i: usize) -> Option<f64> {
        (i < self.n_bins).then(|| self.lower + (i as f64 + 0.5) * self.bin_width())
    }

    /// Sum of weights over all finite fills, including under/overflow.
    pub fn sum_weights(&self) -> f64 {
        self.sumw
    }

    /// Immutable copy for presentation and serialization.
    pub fn snapshot(&self, name: impl Into<String>) -> HistogramSnapshot {
        HistogramSnapshot {
            name: name.into(),
            n_bins: self.n_bins,
            x_min: self.lower,
            x_max: self.upper,
            bin_edges: self.bin_edges(),
            bin_content: self.bin_content.clone(),
            sumw2: self.bin_sumw2.clone(),
            underflow: self.underflow,
            overflow: self.overflow,
            entries: self.entries,
            rejected: self.rejected,
            sum_weights: self.sumw,
            mean: self.mean(),
            std_dev: self.std_dev(),
        }
    }
}

/// A finished 1D histogram handed to presentation or written as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    /// Histogram name.
    pub name: String,
    /// Number of bins (excluding under/overflow).
    pub n_bins: usize,
    /// Lower edge of first bin.
    pub x_min: f64,
    /// Upper edge of last bin.
    pub x_max: f64,
    /// Bin edges (length = n_bins + 1).
    pub bin_edges: Vec<f64>,
    /// Bin contents (length = n_bins, excluding under/overflow).
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin.
    pub sumw2: Vec<f64>,
    /// Underflow sum of weights.
    pub underflow: f64,
    /// Overflow sum of weights.
    pub overflow: f64,
    /// Number of accepted fills.
    pub entries: u64,
    /// Number of rejected (non-finite) fills.
    pub rejected: u64,
    /// Total sum of weights.
    pub sum_weights: f64,
    /// Weighted mean, absent when there is no data.
    pub mean: Option<f64>,
    /// Weighted standard deviation, absent when there is no data.
    pub std_dev: Option<f64>,
}

impl HistogramSnapshot {
    /// Largest bin content (0 for an empty histogram).
    pub fn max_content(&self) -> f64 {
        self.bin_content.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn binning_literal_case() {
        let mut h = Histogram::new(5, 0.0, 10.0).unwrap();
        h.fill(0.0, 1.0);
        h.fill(9.999, 1.0);
        h.fill(10.0, 1.0);
        h.fill(-1.0, 1.0);

        assert_eq!(h.bin_content(0), Some(1.0));
        assert_eq!(h.bin_content(4), Some(1.0));
        assert_eq!(h.overflow(), 1.0);
        assert_eq!(h.underflow(), 1.0);
        assert_eq!(h.contents(), &[1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_relative_eq!(h.mean().unwrap(), 4.74975, epsilon = 1e-12);
    }

    #[test]
    fn unit_weights_are_conserved() {
        let mut h = Histogram::new(7, -3.0, 4.0).unwrap();
        let values: Vec<f64> = (0..200).map(|i| (i as f64) * 0.037 - 4.5).collect();
        for &v in &values {
            h.fill(v, 1.0);
        }
        let total = h.integral() + h.underflow() + h.overflow();
        assert_eq!(total, values.len() as f64);
        assert_eq!(h.entries(), values.len() as u64);
    }

    #[test]
    fn no_data_has_no_moments() {
        let h = Histogram::new(10, 0.0, 1.0).unwrap();
        assert_eq!(h.mean(), None);
        assert_eq!(h.variance(), None);
        assert_eq!(h.std_dev(), None);
        let snap = h.snapshot("empty");
        assert_eq!(snap.mean, None);
        assert_eq!(snap.max_content(), 0.0);
    }

    #[test]
    fn variance_matches_second_moment() {
        let mut h = Histogram::new(10, 0.0, 10.0).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0] {
            h.fill(v, 1.0);
        }
        assert_relative_eq!(h.mean().unwrap(), 2.5);
        assert_relative_eq!(h.variance().unwrap(), 1.25, epsilon = 1e-12);
        assert_relative_eq!(h.std_dev().unwrap(), 1.25_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn last_bin_clamps_rounding() {
        let h = Histogram::new(3, 0.0, 0.3).unwrap();
        let just_below = 0.3 - f64::EPSILON * 0.25;
        assert!(just_below < 0.3);
        assert_eq!(h.find_bin(just_below), Some(2));
        assert_eq!(h.find_bin(0.3), None);
        assert_eq!(h.find_bin(0.0), Some(0));
    }

    #[test]
    fn non_finite_policy() {
        let mut h = Histogram::new(4, 0.0, 4.0).unwrap();
        h.fill(1.5, 1.0);
        h.fill(f64::NAN, 1.0);
        h.fill(2.5, f64::INFINITY);
        h.fill(f64::INFINITY, 1.0);
        h.fill(f64::NEG_INFINITY, 2.0);

        assert_eq!(h.rejected(), 2);
        assert_eq!(h.entries(), 3);
        assert_eq!(h.overflow(), 1.0);
        assert_eq!(h.underflow(), 2.0);
        assert_eq!(h.bin_content(2), Some(0.0));
        assert_eq!(h.mean(), Some(1.5));
        assert_eq!(h.sum_weights(), 1.0);
    }

    #[test]
    fn negative_weights_subtract() {
        let mut h = Histogram::new(2, 0.0, 2.0).unwrap();
        h.fill(0.5, 3.0);
        h.fill(0.5, -1.0);
        assert_eq!(h.bin_content(0), Some(2.0));
        assert_eq!(h.bin_sumw2(0), Some(10.0));
        assert_relative_eq!(h.mean().unwrap(), 0.5);

        h.fill(1.5, -2.0);
        assert_eq!(h.sum_weights(), 0.0);
        assert_eq!(h.mean(), None);
    }

    #[test]
    fn invalid_geometry_rejected() {
        assert!(matches!(Histogram::new(0, 0.0, 1.0), Err(Error::Config(_))));
        assert!(matches!(Histogram::new(5, 1.0, 1.0), Err(Error::Config(_))));
        assert!(matches!(Histogram::new(5, 2.0, 1.0), Err(Error::Config(_))));
        assert!(matches!(Histogram::new(5, f64::NAN, 1.0), Err(Error::Config(_))));
        assert!(matches!(Histogram::new(5, 0.0, f64::INFINITY), Err(Error::Config(_))));
    }

    #[test]
    fn unrepresentable_bin_width_rejected() {
        assert!(matches!(Histogram::new(4, -1e308, 1e308), Err(Error::Config(_))));
        assert!(matches!(Histogram::new(4, f64::MIN, f64::MAX), Err(Error::Config(_))));

        let mut h = Histogram::new(4, -1e307, 1e307).unwrap();
        h.fill(9e306, 1.0);
        assert_eq!(h.contents(), &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn overflowing_moments_are_rejected() {
        let mut h = Histogram::new(4, 0.0, 4.0).unwrap();
        h.fill(1e200, 1.0);
        assert_eq!(h.rejected(), 1);
        assert_eq!(h.entries(), 0);
        assert_eq!(h.overflow(), 0.0);

        h.fill(0.5, 1.0);
        assert_eq!(h.mean(), Some(0.5));
        assert_eq!(h.variance(), Some(0.0));

        // Each square fits, their sum does not.
        h.fill(1e154, 1.0);
        h.fill(1e154, 1.0);
        assert_eq!(h.rejected(), 2);
        assert_eq!(h.entries(), 2);
        assert!(h.variance().unwrap().is_finite());
    }

    #[test]
    fn merge_equals_single_pass() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64) * 0.7 - 3.0).collect();
        let mut whole = Histogram::new(8, 0.0, 16.0).unwrap();
        let mut left = Histogram::new(8, 0.0, 16.0).unwrap();
        let mut right = Histogram::new(8, 0.0, 16.0).unwrap();
        for (i, &v) in values.iter().enumerate() {
            whole.fill(v, 1.0);
            if i < 20 { left.fill(v, 1.0) } else { right.fill(v, 1.0) }
        }
        left.merge(&right).unwrap();
        assert_eq!(left.contents(), whole.contents());
        assert_eq!(left.underflow(), whole.underflow());
        assert_eq!(left.overflow(), whole.overflow());
        assert_eq!(left.entries(), whole.entries());
        assert_relative_eq!(left.mean().unwrap(), whole.mean().unwrap(), epsilon = 1e-12);

        let other = Histogram::new(4, 0.0, 16.0).unwrap();
        assert!(matches!(left.merge(&other), Err(Error::Config(_))));
    }

    #[test]
    fn edges_and_centers() {
        let h = Histogram::new(4, -2.0, 2.0).unwrap();
        assert_eq!(h.bin_edges(), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(h.bin_center(1), Some(-0.5));
        assert_eq!(h.bin_center(4), None);
        let snap = h.snapshot("h");
        assert_eq!(snap.bin_edges.len(), snap.n_bins + 1);
    }
}
