//! Cross-thread signals of the permutation phase: a cancellation
//! token, per-worker completion counters, and the monitor loop that
//! watches both while the workers run.

use crate::common::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Returned when the caller interrupts the single-threaded set-up
/// that precedes the permutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "computation interrupted by the user")
    }
}

impl std::error::Error for Cancelled {}

/// Poll a host interrupt check; `Err(Cancelled)` once it fires
pub fn check_interrupt(host_interrupt: &dyn Fn() -> bool) -> anyhow::Result<()> {
    if host_interrupt() {
        return Err(Cancelled.into());
    }
    Ok(())
}

// one cache line per slot so that workers bumping their own counter
// do not invalidate each other's lines
#[repr(align(64))]
#[derive(Debug, Default)]
struct PaddedCounter(AtomicUsize);

/// Completed-permutation counters, one slot per worker. Each slot
/// has a single writer (its worker); anyone may read.
#[derive(Debug)]
pub struct ProgressCounters {
    slots: Vec<PaddedCounter>,
}

impl ProgressCounters {
    pub fn new(num_workers: usize) -> Self {
        Self {
            slots: (0..num_workers).map(|_| PaddedCounter::default()).collect(),
        }
    }

    pub fn increment(&self, worker: usize) {
        self.slots[worker].0.fetch_add(1, Ordering::Release);
    }

    pub fn get(&self, worker: usize) -> usize {
        self.slots[worker].0.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Vec<usize> {
        (0..self.slots.len()).map(|w| self.get(w)).collect()
    }
}

/// A progress update handed to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub per_worker: Vec<usize>,
}

/// Watches worker counters from the spawning thread.
pub struct ProgressMonitor<'a> {
    pub total: usize,
    pub counters: &'a ProgressCounters,
    pub cancel: &'a CancelToken,
    pub poll_interval: Duration,
    pub verbose: bool,
}

impl ProgressMonitor<'_> {
    /// Poll until `all_finished` holds.
    ///
    /// Every round: forward a host interrupt into the shared cancel
    /// token, and report progress to `on_progress` if the completed
    /// count moved since the last report. The last report is made
    /// after every worker has finished.
    pub fn watch(
        &self,
        all_finished: impl Fn() -> bool,
        host_interrupt: &dyn Fn() -> bool,
        on_progress: &mut dyn FnMut(&Progress),
    ) -> Progress {
        let pb = ProgressBar::new(self.total as u64);
        if self.verbose {
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} permutations (eta {eta})",
            ) {
                pb.set_style(style);
            }
        } else {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        let mut last_reported: Option<usize> = None;
        let progress = loop {
            let finished = all_finished();

            if !self.cancel.is_cancelled() && host_interrupt() {
                warn!("interrupt received: stopping the permutation workers");
                self.cancel.cancel();
            }

            let per_worker = self.counters.snapshot();
            let completed = per_worker.iter().sum::<usize>();
            let progress = Progress {
                completed,
                total: self.total,
                per_worker,
            };

            if last_reported != Some(completed) {
                pb.set_position(completed as u64);
                on_progress(&progress);
                last_reported = Some(completed);
            }

            if finished {
                break progress;
            }
            std::thread::sleep(self.poll_interval);
        };

        if self.cancel.is_cancelled() {
            pb.abandon();
        } else {
            pb.finish_and_clear();
        }
        progress
    }
}
