//! Observed statistics and permutation nulls for a discovery/test
//! pair of datasets, end to end.

use crate::common::*;
use crate::dataset::{Dataset, ScaledDataset};
use crate::discovery::DiscoveryCache;
use crate::index_maps::{module_row_map, IndexMap, ModuleMap, NullPool};
use crate::null_dist::*;
use crate::observed::observed_statistics;
use crate::progress::*;

use ndarray::{Array2, Array3, Axis};
use std::str::FromStr;
use std::time::Duration;

/// Which test nodes a permutation may hand to a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullHypothesis {
    /// assigned nodes that also exist in the test dataset
    #[default]
    Overlap,
    /// every node of the test dataset
    All,
}

impl FromStr for NullHypothesis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "overlap" => Ok(Self::Overlap),
            "all" => Ok(Self::All),
            _ => Err(anyhow::anyhow!(
                "unknown null hypothesis `{}`: expected `overlap` or `all`",
                s
            )),
        }
    }
}

impl std::fmt::Display for NullHypothesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overlap => write!(f, "overlap"),
            Self::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreservationArgs {
    pub n_perm: usize,
    pub n_threads: usize,
    pub null_hypothesis: NullHypothesis,
    pub verbose: bool,
    /// worker `w` uses `seed + w`; `None` seeds from the OS
    pub seed: Option<u64>,
    pub poll_interval: Duration,
}

impl Default for PreservationArgs {
    fn default() -> Self {
        Self {
            n_perm: 10_000,
            n_threads: 1,
            null_hypothesis: NullHypothesis::Overlap,
            verbose: false,
            seed: None,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Validated inputs of one comparison
pub struct PreservationInput<'a> {
    pub discovery: Dataset<'a>,
    pub test: Dataset<'a>,
    /// `(node, module)` pairs of the discovery-side assignment
    pub assignment: &'a [(Box<str>, Box<str>)],
    /// modules to analyse; row order of every output
    pub modules: &'a [Box<str>],
}

#[derive(Debug, Clone)]
pub struct PreservationOut {
    pub modules: Vec<Box<str>>,
    /// module → row of `observed`, `nulls` and `p_values()`
    pub module_rows: IndexMap,
    /// modules × 7
    pub observed: Array2<Stat>,
    /// modules × 7 × permutations
    pub nulls: Array3<Stat>,
    pub stat_names: Vec<Box<str>>,
    pub perm_names: Vec<Box<str>>,
    /// true if the permutation phase stopped early
    pub cancelled: bool,
}

impl PreservationOut {
    pub fn row(&self, module: &str) -> Option<usize> {
        self.module_rows.get(module).copied()
    }

    /// One-sided permutation p-values, `(1 + #{null >= observed}) /
    /// (1 + #nulls)` over the non-missing nulls of each cell
    pub fn p_values(&self) -> Array2<Stat> {
        let mut ret = Array2::from_elem(self.observed.dim(), None);
        for ((r, s), &obs) in self.observed.indexed_iter() {
            let Some(obs) = obs else { continue };

            let nulls = self.nulls.index_axis(Axis(0), r);
            let (hits, total) = nulls
                .index_axis(Axis(0), s)
                .iter()
                .flatten()
                .fold((0usize, 0usize), |(h, n), &x| {
                    (h + usize::from(x >= obs), n + 1)
                });

            if total > 0 {
                ret[(r, s)] = Some((1 + hits) as f64 / (1 + total) as f64);
            }
        }
        ret
    }

    /// Number of permutations with at least one non-missing value
    pub fn num_completed_permutations(&self) -> usize {
        self.nulls
            .axis_iter(Axis(2))
            .filter(|perm| perm.iter().any(Option::is_some))
            .count()
    }
}

/// Node names present in both datasets
fn shared_nodes(disc: &ScaledDataset, test: &ScaledDataset) -> IndexMap {
    disc.node_names
        .iter()
        .filter(|x| test.index.contains_key(*x))
        .enumerate()
        .map(|(i, x)| (x.clone(), i))
        .collect()
}

/// Compute the observed preservation statistics of every requested
/// module and their permutation null distributions.
///
/// * `interrupt` - host interrupt check; during set-up it aborts
///   with `Cancelled`, during the permutations it stops the workers
///   and the partial result is returned
/// * `on_progress` - receives completed-permutation counts, only
///   when they change
pub fn run_preservation(
    input: &PreservationInput,
    args: &PreservationArgs,
    interrupt: &dyn Fn() -> bool,
    on_progress: &mut dyn FnMut(&Progress),
) -> anyhow::Result<PreservationOut> {
    let disc = ScaledDataset::new(input.discovery);
    check_interrupt(interrupt)?;
    let test = ScaledDataset::new(input.test);
    check_interrupt(interrupt)?;

    info!(
        "discovery: {} nodes × {} samples, test: {} nodes × {} samples",
        disc.num_nodes(),
        disc.num_samples(),
        test.num_nodes(),
        test.num_samples()
    );

    let assignment = ModuleMap::from_assignment(
        input
            .assignment
            .iter()
            .map(|(node, module)| (node.as_ref(), module.as_ref())),
    );
    let shared = shared_nodes(&disc, &test);
    let module_map = assignment.restrict_to(&shared);
    check_interrupt(interrupt)?;

    let pool = match args.null_hypothesis {
        NullHypothesis::Overlap => NullPool::overlap(&assignment, &test.index),
        NullHypothesis::All => NullPool::all(test.node_names, &test.index),
    };
    info!(
        "{} nodes shared, {} nodes in the `{}` permutation pool",
        shared.len(),
        pool.len(),
        args.null_hypothesis
    );
    check_interrupt(interrupt)?;

    let cache = DiscoveryCache::build(&disc, &module_map, input.modules, interrupt)?;
    info!("cached discovery statistics of {} modules", cache.len());

    let observed = observed_statistics(&test, &module_map, input.modules, &cache);
    check_interrupt(interrupt)?;

    let mut nulls = empty_null_cube(input.modules.len(), args.n_perm);
    let cancel = CancelToken::new();

    let engine = NullEngine {
        test: &test,
        module_map: &module_map,
        modules: input.modules,
        cache: &cache,
        pool: &pool,
        seed: args.seed,
    };
    let config = NullRunConfig {
        n_threads: args.n_threads,
        cancel: &cancel,
        poll_interval: args.poll_interval,
        verbose: args.verbose,
    };

    info!(
        "running {} permutations on {} threads",
        args.n_perm, args.n_threads
    );
    let summary = engine.run(&mut nulls, &config, interrupt, on_progress)?;

    Ok(PreservationOut {
        modules: input.modules.to_vec(),
        module_rows: module_row_map(input.modules),
        observed,
        nulls,
        stat_names: STAT_NAMES.iter().map(|&x| Box::from(x)).collect(),
        perm_names: permutation_names(args.n_perm),
        cancelled: summary.was_cancelled(),
    })
}
