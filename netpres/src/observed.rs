use crate::common::*;
use crate::dataset::ScaledDataset;
use crate::discovery::DiscoveryCache;
use crate::index_maps::ModuleMap;
use crate::module_stats::*;
use ndarray::Array2;

/// Preservation statistics of one module under a given test-side
/// index set; all missing when the set is empty or the module has no
/// discovery reference
pub fn module_preservation(
    test: &ScaledDataset,
    idx: &[usize],
    reference: Option<&ModuleSummary>,
) -> PreservationStats {
    match reference {
        Some(disc) if !idx.is_empty() => {
            preservation_stats(disc, &ModuleSummary::compute(test, idx))
        }
        _ => missing_stats(),
    }
}

/// modules × 7 table of statistics on the real test-dataset node
/// assignment; row `r` belongs to `modules[r]`
pub fn observed_statistics(
    test: &ScaledDataset,
    module_map: &ModuleMap,
    modules: &[Box<str>],
    cache: &DiscoveryCache,
) -> Array2<Stat> {
    let mut observed = Array2::from_elem((modules.len(), NUM_STATS), None);

    for (r, module) in modules.iter().enumerate() {
        let idx = module_map.node_indices(module, &test.index);
        let stats = module_preservation(test, &idx, cache.get(module));

        if stats.iter().all(Option::is_none) {
            warn!("module {}: no observed statistic could be computed", module);
        }

        for (s, x) in stats.into_iter().enumerate() {
            observed[(r, s)] = x;
        }
    }
    observed
}
