//! Permutation null distributions of the preservation statistics.
//!
//! Each permutation shuffles the pool of eligible test nodes; every
//! module then takes the nodes sitting at its members' pool slots,
//! so it keeps its size but gets a random node set. The statistics
//! are recomputed exactly as for the observed table.
//!
//! Permutations are split into contiguous chunks, one per worker
//! thread, and each worker owns the matching depth-slice of the
//! result cube. Cells are pre-filled with `None`, so anything a
//! cancelled worker did not reach stays missing.

use crate::common::*;
use crate::dataset::ScaledDataset;
use crate::discovery::DiscoveryCache;
use crate::index_maps::{ModuleMap, NullPool};
use crate::module_stats::*;
use crate::progress::*;

use ndarray::{Array3, ArrayViewMut3, Axis};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;

/// Split `n_perm` permutations over `n_workers` as evenly as
/// possible; the first `n_perm % n_workers` workers take one extra.
/// Returns `(start, count)` per worker, contiguous and disjoint.
pub fn partition_permutations(n_perm: usize, n_workers: usize) -> Vec<(usize, usize)> {
    let n_workers = n_workers.max(1);
    let base = n_perm / n_workers;
    let extra = n_perm % n_workers;

    let mut start = 0;
    (0..n_workers)
        .map(|w| {
            let count = base + usize::from(w < extra);
            let chunk = (start, count);
            start += count;
            chunk
        })
        .collect()
}

/// Allocate the modules × 7 × permutations cube, all missing
pub fn empty_null_cube(n_modules: usize, n_perm: usize) -> Array3<Stat> {
    Array3::from_elem((n_modules, NUM_STATS, n_perm), None)
}

/// How a worker thread ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// every permutation of its chunk was computed
    Completed,
    /// it saw the cancel flag and stopped early
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct NullRunSummary {
    pub exits: Vec<WorkerExit>,
    pub progress: Progress,
}

impl NullRunSummary {
    pub fn was_cancelled(&self) -> bool {
        self.exits.contains(&WorkerExit::Cancelled)
    }
}

/// Everything the workers read, shared by reference
pub struct NullEngine<'a> {
    pub test: &'a ScaledDataset<'a>,
    pub module_map: &'a ModuleMap,
    pub modules: &'a [Box<str>],
    pub cache: &'a DiscoveryCache,
    pub pool: &'a NullPool,
    /// worker `w` seeds its generator with `seed + w`
    pub seed: Option<u64>,
}

/// Knobs of one parallel run
pub struct NullRunConfig<'a> {
    pub n_threads: usize,
    pub cancel: &'a CancelToken,
    pub poll_interval: Duration,
    pub verbose: bool,
}

impl NullEngine<'_> {
    /// Fill `nulls` (modules × 7 × permutations) using
    /// `config.n_threads` worker threads while this thread monitors
    /// progress and host interrupts.
    pub fn run(
        &self,
        nulls: &mut Array3<Stat>,
        config: &NullRunConfig,
        host_interrupt: &dyn Fn() -> bool,
        on_progress: &mut dyn FnMut(&Progress),
    ) -> anyhow::Result<NullRunSummary> {
        let n_perm = nulls.len_of(Axis(2));
        let chunks = partition_permutations(n_perm, config.n_threads);
        let counters = ProgressCounters::new(chunks.len());
        let cancel = config.cancel;

        let slices = nulls.view_mut();

        let (exits, progress) = std::thread::scope(|scope| {
            let mut rest = slices;
            let mut handles = Vec::with_capacity(chunks.len());

            for (worker, &(_, count)) in chunks.iter().enumerate() {
                let (slice, tail) = rest.split_at(Axis(2), count);
                rest = tail;
                let counters = &counters;
                handles.push(
                    scope.spawn(move || self.run_worker(worker, slice, counters, cancel)),
                );
            }

            let monitor = ProgressMonitor {
                total: n_perm,
                counters: &counters,
                cancel,
                poll_interval: config.poll_interval,
                verbose: config.verbose,
            };
            let progress = monitor.watch(
                || handles.iter().all(|h| h.is_finished()),
                host_interrupt,
                on_progress,
            );

            let exits = handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .map_err(|_| anyhow::anyhow!("a permutation worker panicked"))
                })
                .collect::<anyhow::Result<Vec<_>>>();
            exits.map(|e| (e, progress))
        })?;

        let summary = NullRunSummary { exits, progress };
        if summary.was_cancelled() {
            warn!(
                "cancelled after {} of {} permutations; the rest are missing",
                summary.progress.completed, n_perm
            );
        } else {
            info!("finished {} permutations", summary.progress.completed);
        }
        Ok(summary)
    }

    /// Compute the permutations of one depth-slice
    pub fn run_worker(
        &self,
        worker: usize,
        mut slice: ArrayViewMut3<Stat>,
        counters: &ProgressCounters,
        cancel: &CancelToken,
    ) -> WorkerExit {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => SmallRng::from_os_rng(),
        };
        let mut pool = self.pool.indices().to_vec();

        for p in 0..slice.len_of(Axis(2)) {
            pool.shuffle(&mut rng);

            for (r, module) in self.modules.iter().enumerate() {
                if cancel.is_cancelled() {
                    return WorkerExit::Cancelled;
                }

                let idx = self.pool.draw(&pool, self.module_map.members(module));
                let disc = match self.cache.get(module) {
                    Some(disc) if !idx.is_empty() => disc,
                    _ => continue,
                };

                let Some(test) =
                    ModuleSummary::compute_until(self.test, &idx, || cancel.is_cancelled())
                else {
                    return WorkerExit::Cancelled;
                };

                for (s, x) in preservation_stats(disc, &test).into_iter().enumerate() {
                    slice[(r, s, p)] = x;
                }
            }
            counters.increment(worker);
        }
        WorkerExit::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_covers_everything() {
        for n_perm in [0, 1, 7, 100, 1001] {
            for n_workers in 1..=9 {
                let chunks = partition_permutations(n_perm, n_workers);
                assert_eq!(chunks.len(), n_workers);
                assert_eq!(chunks.iter().map(|c| c.1).sum::<usize>(), n_perm);

                let max = chunks.iter().map(|c| c.1).max().unwrap();
                let min = chunks.iter().map(|c| c.1).min().unwrap();
                assert!(max - min <= 1);

                let mut next = 0;
                for &(start, count) in &chunks {
                    assert_eq!(start, next);
                    next += count;
                }
            }
        }
    }

    #[test]
    fn remainder_goes_to_first_workers() {
        assert_eq!(
            partition_permutations(10, 4),
            vec![(0, 3), (3, 3), (6, 2), (8, 2)]
        );
    }

    #[test]
    fn cube_starts_missing() {
        let cube = empty_null_cube(3, 5);
        assert_eq!(cube.dim(), (3, NUM_STATS, 5));
        assert!(cube.iter().all(Option::is_none));
    }
}
