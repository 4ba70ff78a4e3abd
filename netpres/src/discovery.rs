use crate::common::*;
use crate::dataset::ScaledDataset;
use crate::index_maps::ModuleMap;
use crate::module_stats::ModuleSummary;
use crate::progress::check_interrupt;

/// Discovery-side property vectors of every requested module,
/// computed once and then used read-only as the reference of every
/// observed and permuted comparison.
#[derive(Debug, Default)]
pub struct DiscoveryCache {
    summaries: HashMap<Box<str>, ModuleSummary>,
}

impl DiscoveryCache {
    /// * `disc` - discovery dataset
    /// * `module_map` - module members, already restricted to the
    ///   nodes being compared
    /// * `modules` - modules to cache
    /// * `host_interrupt` - polled between steps; aborts with
    ///   `Cancelled`
    pub fn build(
        disc: &ScaledDataset,
        module_map: &ModuleMap,
        modules: &[Box<str>],
        host_interrupt: &dyn Fn() -> bool,
    ) -> anyhow::Result<Self> {
        let mut summaries = HashMap::default();
        for module in modules {
            let idx = module_map.node_indices(module, &disc.index);
            check_interrupt(host_interrupt)?;

            let summary = ModuleSummary::compute_until(disc, &idx, host_interrupt)
                .ok_or(crate::progress::Cancelled)?;

            debug!(
                "discovery module {}: {} nodes, {} node pairs",
                module,
                idx.len(),
                summary.corr_vector.len()
            );
            summaries.insert(module.clone(), summary);
        }
        Ok(Self { summaries })
    }

    pub fn get(&self, module: &str) -> Option<&ModuleSummary> {
        self.summaries.get(module)
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
