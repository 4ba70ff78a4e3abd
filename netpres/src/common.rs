pub use log::{debug, info, warn};

pub type Mat = nalgebra::DMatrix<f64>;
pub type DVec = nalgebra::DVector<f64>;

/// A scalar statistic; `None` marks a missing value (empty module,
/// zero variance, failed decomposition, cancelled permutation)
pub type Stat = Option<f64>;

pub type HashMap<K, V> = fnv::FnvHashMap<K, V>;

pub const NUM_STATS: usize = 7;

/// Column names of the observed table and the second axis of the
/// null cube
pub const STAT_NAMES: [&str; NUM_STATS] = [
    "avg.weight",
    "coherence",
    "cor.cor",
    "cor.degree",
    "cor.contrib",
    "avg.cor",
    "avg.contrib",
];

/// Keep finite values, everything else becomes missing
#[inline]
pub fn finite(x: f64) -> Stat {
    if x.is_finite() {
        Some(x)
    } else {
        None
    }
}

/// `permutation.1 ... permutation.N`
pub fn permutation_names(n_perm: usize) -> Vec<Box<str>> {
    (1..=n_perm)
        .map(|p| format!("permutation.{}", p).into_boxed_str())
        .collect()
}
