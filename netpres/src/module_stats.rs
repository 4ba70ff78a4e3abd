//! The per-module property vectors and the seven preservation
//! statistics derived from a discovery/test pair of them.

use crate::common::*;
use crate::dataset::ScaledDataset;
use crate::net_stats::*;

/// Property vectors of one module in one dataset, per-node vectors
/// in the order of the index set they were computed from
#[derive(Debug, Clone)]
pub struct ModuleSummary {
    pub weighted_degree: DVec,
    pub node_contribution: DVec,
    pub corr_vector: DVec,
    pub summary_profile: DVec,
}

impl ModuleSummary {
    /// Compute all four property vectors of the module at `idx`
    pub fn compute(ds: &ScaledDataset, idx: &[usize]) -> Self {
        let sorted = SortedIndex::new(idx);
        let summary_profile = summary_profile(&ds.scaled, &sorted);
        Self {
            corr_vector: corr_vector(ds.corr, idx),
            weighted_degree: weighted_degree(ds.net, &sorted),
            node_contribution: node_contribution(&ds.scaled, &sorted, &summary_profile),
            summary_profile,
        }
    }

    /// Same as `compute`, but gives up (`None`) as soon as `stop`
    /// returns true; `stop` is polled after each of the four steps.
    pub fn compute_until(
        ds: &ScaledDataset,
        idx: &[usize],
        stop: impl Fn() -> bool,
    ) -> Option<Self> {
        let corr_vector = corr_vector(ds.corr, idx);
        if stop() {
            return None;
        }

        let sorted = SortedIndex::new(idx);
        let weighted_degree = weighted_degree(ds.net, &sorted);
        if stop() {
            return None;
        }

        let summary_profile = summary_profile(&ds.scaled, &sorted);
        if stop() {
            return None;
        }

        let node_contribution = node_contribution(&ds.scaled, &sorted, &summary_profile);
        if stop() {
            return None;
        }

        Some(Self {
            weighted_degree,
            node_contribution,
            corr_vector,
            summary_profile,
        })
    }
}

/// One row of the observed table / one (module, permutation) fibre
/// of the null cube, in `STAT_NAMES` order
pub type PreservationStats = [Stat; NUM_STATS];

pub fn missing_stats() -> PreservationStats {
    [None; NUM_STATS]
}

/// The seven statistics with `disc` as the fixed reference
pub fn preservation_stats(disc: &ModuleSummary, test: &ModuleSummary) -> PreservationStats {
    [
        average_edge_weight(&test.weighted_degree),
        module_coherence(&test.node_contribution),
        correlation(&disc.corr_vector, &test.corr_vector),
        correlation(&disc.weighted_degree, &test.weighted_degree),
        correlation(&disc.node_contribution, &test.node_contribution),
        sign_aware_mean(&disc.corr_vector, &test.corr_vector),
        sign_aware_mean(&disc.node_contribution, &test.node_contribution),
    ]
}
