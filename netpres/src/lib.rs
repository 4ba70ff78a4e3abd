//! Module preservation between two weighted networks.
//!
//! Given a discovery dataset, a test dataset and a partition of the
//! discovery nodes into modules, measure how well each module's
//! connectivity and co-expression carry over to the test dataset,
//! and calibrate those measures against permutation nulls in which
//! every module keeps its size but receives random test nodes.
//!
//! # Statistics
//!
//! `avg.weight`, `coherence`, `cor.cor`, `cor.degree`,
//! `cor.contrib`, `avg.cor`, `avg.contrib`; see [`common::STAT_NAMES`].
//!
//! # References
//!
//! Ritchie, Watts, Fearnley, Holt, Abraham & Inouye (2016). "A
//! scalable permutation approach reveals replication and preservation
//! patterns of network modules in large datasets." Cell Systems.

/// Shared type aliases, statistic names and the missing marker
pub mod common;

/// Name to index tables, module membership and the permutation pool
pub mod index_maps;

/// Weighted degree, summary profile, node contribution and friends
pub mod net_stats;

/// Borrowed and standardized datasets
pub mod dataset;

/// Per-module property vectors and the seven statistics
pub mod module_stats;

/// Discovery-side reference vectors, computed once
pub mod discovery;

/// Statistics on the real test-node assignment
pub mod observed;

/// Cancellation token, progress counters and the monitor loop
pub mod progress;

/// Multi-threaded permutation nulls
pub mod null_dist;

/// Observed statistics plus nulls, end to end
pub mod preservation;

/// Single-dataset module properties
pub mod properties;


pub use dataset::Dataset;
pub use preservation::{
    run_preservation, NullHypothesis, PreservationArgs, PreservationInput, PreservationOut,
};
pub use progress::{CancelToken, Cancelled, Progress};
pub use properties::{network_properties, ModuleProperties};
