use crate::common::*;
use crate::index_maps::{make_index_map, IndexMap};
use matrix_util::traits::MatOps;

/// One dataset as handed over by the caller. Node order is shared by
/// the columns of `data` and the rows/columns of `corr` and `net`.
#[derive(Clone, Copy)]
pub struct Dataset<'a> {
    /// samples × nodes
    pub data: &'a Mat,
    /// nodes × nodes correlation coefficients
    pub corr: &'a Mat,
    /// nodes × nodes edge weights
    pub net: &'a Mat,
    pub node_names: &'a [Box<str>],
}

/// Read-only view used by every statistic computation: standardized
/// data plus lookups, shared across worker threads by reference.
pub struct ScaledDataset<'a> {
    pub scaled: Mat,
    pub corr: &'a Mat,
    pub net: &'a Mat,
    pub node_names: &'a [Box<str>],
    pub index: IndexMap,
}

impl<'a> ScaledDataset<'a> {
    pub fn new(ds: Dataset<'a>) -> Self {
        Self {
            scaled: ds.data.scale_columns(),
            corr: ds.corr,
            net: ds.net,
            node_names: ds.node_names,
            index: make_index_map(ds.node_names),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.node_names.len()
    }

    pub fn num_samples(&self) -> usize {
        self.scaled.nrows()
    }
}
