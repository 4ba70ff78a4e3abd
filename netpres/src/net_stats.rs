//! Network summary statistics of a module.
//!
//! Every function takes the module's row/column indices into one
//! dataset's matrices. Index sets must be non-empty; callers branch
//! on emptiness beforehand and emit missing values instead.

use crate::common::*;
use matrix_util::dmatrix_util::pearson;

/// An index set together with its ascending order.
///
/// Column-major matrices are read fastest walking down columns in
/// ascending order, so statistics are computed on `sorted()` and
/// then mapped back to the caller's order with `restore`.
#[derive(Debug, Clone)]
pub struct SortedIndex {
    sorted: Vec<usize>,
    rank: Vec<usize>,
}

impl SortedIndex {
    pub fn new(idx: &[usize]) -> Self {
        let mut order: Vec<usize> = (0..idx.len()).collect();
        order.sort_by_key(|&k| idx[k]);

        let sorted = order.iter().map(|&k| idx[k]).collect();
        let mut rank = vec![0; idx.len()];
        for (pos, &k) in order.iter().enumerate() {
            rank[k] = pos;
        }
        Self { sorted, rank }
    }

    pub fn sorted(&self) -> &[usize] {
        &self.sorted
    }

    /// Position of each original entry within `sorted()`
    pub fn rank(&self) -> &[usize] {
        &self.rank
    }

    /// `out[k] = v[rank[k]]`: from sorted order back to caller order
    pub fn restore(&self, v: &DVec) -> DVec {
        DVec::from_fn(self.rank.len(), |k, _| v[self.rank[k]])
    }
}

/// Sum of each node's edge weights to the other nodes of the set,
/// aligned to the caller's order
pub fn weighted_degree(net: &Mat, idx: &SortedIndex) -> DVec {
    let sorted = idx.sorted();
    let degree = DVec::from_fn(sorted.len(), |b, _| {
        let col = net.column(sorted[b]);
        sorted
            .iter()
            .enumerate()
            .filter(|&(a, _)| a != b)
            .map(|(_, &i)| col[i])
            .sum()
    });
    idx.restore(&degree)
}

/// The module's dominant sample-wise signal: the left singular
/// vector of the largest singular value of the scaled data
/// restricted to the module's columns.
///
/// Oriented so that the member columns correlate with it positively
/// on average. All NaN if the data hold non-finite values, if no
/// member column varies, or if the decomposition fails.
pub fn summary_profile(scaled: &Mat, idx: &SortedIndex) -> DVec {
    let nn = scaled.nrows();
    let failed = || DVec::from_element(nn, f64::NAN);

    let xx = scaled.select_columns(idx.sorted());
    if xx.is_empty() || xx.iter().any(|x| !x.is_finite()) {
        return failed();
    }

    let svd = xx.clone().svd(true, false);
    let Some(uu) = svd.u.as_ref() else {
        return failed();
    };
    let k = svd.singular_values.imax();
    let mut profile = uu.column(k).into_owned();

    let contrib = column_correlations(&xx, &profile);
    let finite: Vec<f64> = contrib.iter().copied().filter(|c| c.is_finite()).collect();
    // no member varies: the singular vector is arbitrary
    if finite.is_empty() {
        return failed();
    }
    if finite.iter().sum::<f64>() < 0.0 {
        profile.neg_mut();
    }
    profile
}

/// Correlation between each module node and the summary profile,
/// aligned to the caller's order
pub fn node_contribution(scaled: &Mat, idx: &SortedIndex, profile: &DVec) -> DVec {
    let xx = scaled.select_columns(idx.sorted());
    idx.restore(&column_correlations(&xx, profile))
}

fn column_correlations(xx: &Mat, yy: &DVec) -> DVec {
    let y = yy.as_slice();
    DVec::from_iterator(
        xx.ncols(),
        xx.column_iter().map(|x_j| pearson(x_j.as_slice(), y)),
    )
}

/// Correlation coefficients of every unordered node pair, pair
/// `(i, j)` with `i < j` in caller order, enumerated by `j` then `i`
pub fn corr_vector(corr: &Mat, idx: &[usize]) -> DVec {
    let kk = idx.len();
    let mut ret = Vec::with_capacity(kk * kk.saturating_sub(1) / 2);
    for j in 1..kk {
        let col = corr.column(idx[j]);
        for &i in &idx[..j] {
            ret.push(col[i]);
        }
    }
    DVec::from_vec(ret)
}

/// Mean weighted degree
pub fn average_edge_weight(weighted_degree: &DVec) -> Stat {
    if weighted_degree.is_empty() {
        return None;
    }
    finite(weighted_degree.mean())
}

/// Mean squared node contribution
pub fn module_coherence(node_contribution: &DVec) -> Stat {
    if node_contribution.is_empty() {
        return None;
    }
    finite(node_contribution.norm_squared() / node_contribution.len() as f64)
}

/// Pearson correlation; missing for unequal lengths or a constant
/// vector
pub fn correlation(xx: &DVec, yy: &DVec) -> Stat {
    if xx.len() != yy.len() {
        return None;
    }
    finite(pearson(xx.as_slice(), yy.as_slice()))
}

/// Mean of `sign(x_i) * y_i`: test values count towards the mean in
/// the direction the reference expects them
pub fn sign_aware_mean(xx: &DVec, yy: &DVec) -> Stat {
    if xx.is_empty() || xx.len() != yy.len() {
        return None;
    }
    let tot: f64 = xx.iter().zip(yy.iter()).map(|(&x, &y)| sign(x) * y).sum();
    finite(tot / xx.len() as f64)
}

/// Zero for zero (unlike `f64::signum`), NaN for NaN
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}
