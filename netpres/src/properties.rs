//! Module properties within a single dataset, no comparison and no
//! permutations.

use crate::common::*;
use crate::index_maps::{make_index_map, ModuleMap};
use crate::net_stats::*;
use crate::progress::check_interrupt;
use matrix_util::traits::MatOps;
use serde::Serialize;

/// Properties of one module. Per-member vectors follow `members`;
/// members absent from the dataset get `None`.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleProperties {
    pub module: Box<str>,
    pub members: Vec<Box<str>>,
    pub degree: Vec<Stat>,
    pub avg_weight: Stat,
    /// per sample; only with data
    pub summary: Option<Vec<Stat>>,
    /// per member; only with data
    pub contribution: Option<Vec<Stat>>,
    /// only with data
    pub coherence: Option<Stat>,
}

impl ModuleProperties {
    fn missing(module: &str, members: &[Box<str>], num_samples: Option<usize>) -> Self {
        Self {
            module: module.into(),
            members: members.to_vec(),
            degree: vec![None; members.len()],
            avg_weight: None,
            summary: num_samples.map(|n| vec![None; n]),
            contribution: num_samples.map(|_| vec![None; members.len()]),
            coherence: num_samples.map(|_| None),
        }
    }

    pub fn num_present(&self) -> usize {
        self.degree.iter().filter(|x| x.is_some()).count()
    }
}

/// Scatter `values` (one per present member) into a vector over all
/// members
fn fill(num_members: usize, slots: &[usize], values: &DVec) -> Vec<Stat> {
    let mut ret = vec![None; num_members];
    for (&k, &x) in slots.iter().zip(values.iter()) {
        ret[k] = finite(x);
    }
    ret
}

/// Weighted degree and average edge weight of every requested module
/// and, when `data` (samples × nodes) is given, also its summary
/// profile, node contributions and coherence.
///
/// * `net` - nodes × nodes edge weights ordered as `node_names`
/// * `assignment` - `(node, module)` pairs; may name nodes missing
///   from `node_names`
/// * `interrupt` - polled between steps; aborts with `Cancelled`
pub fn network_properties(
    data: Option<&Mat>,
    net: &Mat,
    node_names: &[Box<str>],
    assignment: &[(Box<str>, Box<str>)],
    modules: &[Box<str>],
    interrupt: &dyn Fn() -> bool,
) -> anyhow::Result<Vec<ModuleProperties>> {
    let scaled = data.map(|x| x.scale_columns());
    check_interrupt(interrupt)?;

    let node_index = make_index_map(node_names);
    let module_map = ModuleMap::from_assignment(
        assignment
            .iter()
            .map(|(node, module)| (node.as_ref(), module.as_ref())),
    );
    check_interrupt(interrupt)?;

    let num_samples = scaled.as_ref().map(|x| x.nrows());
    let mut ret = Vec::with_capacity(modules.len());

    for module in modules {
        let members = module_map.members(module);

        let (idx, slots): (Vec<usize>, Vec<usize>) = members
            .iter()
            .enumerate()
            .filter_map(|(k, x)| node_index.get(x).map(|&i| (i, k)))
            .unzip();

        if idx.is_empty() {
            warn!("module {}: none of its nodes are in the network", module);
            ret.push(ModuleProperties::missing(module, members, num_samples));
            continue;
        }

        let sorted = SortedIndex::new(&idx);
        let wd = weighted_degree(net, &sorted);
        let mut props = ModuleProperties {
            module: module.clone(),
            members: members.to_vec(),
            degree: fill(members.len(), &slots, &wd),
            avg_weight: average_edge_weight(&wd),
            summary: None,
            contribution: None,
            coherence: None,
        };
        check_interrupt(interrupt)?;

        if let Some(scaled) = scaled.as_ref() {
            let sp = summary_profile(scaled, &sorted);
            check_interrupt(interrupt)?;
            let nc = node_contribution(scaled, &sorted, &sp);
            check_interrupt(interrupt)?;

            props.summary = Some(sp.iter().map(|&x| finite(x)).collect());
            props.contribution = Some(fill(members.len(), &slots, &nc));
            props.coherence = Some(module_coherence(&nc));
        }

        debug!(
            "module {}: {} of {} nodes present",
            module,
            idx.len(),
            members.len()
        );
        ret.push(props);
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn names(xs: &[&str]) -> Vec<Box<str>> {
        xs.iter().map(|&x| Box::from(x)).collect()
    }

    fn pairs(xs: &[(&str, &str)]) -> Vec<(Box<str>, Box<str>)> {
        xs.iter().map(|&(a, b)| (a.into(), b.into())).collect()
    }

    fn toy_net() -> Mat {
        let mut net = Mat::zeros(4, 4);
        for &(i, j, w) in &[(0, 1, 2.0), (0, 2, 4.0), (1, 2, 6.0)] {
            net[(i, j)] = w;
            net[(j, i)] = w;
        }
        net
    }

    #[test]
    fn degree_without_data() {
        let nodes = names(&["A", "B", "C", "D"]);
        let assignment = pairs(&[("A", "M1"), ("Z", "M1"), ("B", "M1"), ("C", "M1")]);
        let props = network_properties(
            None,
            &toy_net(),
            &nodes,
            &assignment,
            &names(&["M1"]),
            &|| false,
        )
        .unwrap();

        let m1 = &props[0];
        assert_eq!(m1.members, names(&["A", "Z", "B", "C"]));
        assert_eq!(m1.degree, vec![Some(6.0), None, Some(8.0), Some(10.0)]);
        assert_eq!(m1.avg_weight, Some(8.0));
        assert!(m1.summary.is_none());
        assert!(m1.contribution.is_none());
        assert!(m1.coherence.is_none());
        assert_eq!(m1.num_present(), 3);
    }

    #[test]
    fn absent_module_is_all_missing() {
        let nodes = names(&["A", "B", "C", "D"]);
        let assignment = pairs(&[("A", "M1"), ("X", "M2"), ("Y", "M2")]);
        let data = Mat::from_fn(6, 4, |i, j| ((i * 7 + j * 3) % 5) as f64);

        for data in [None, Some(&data)] {
            let props = network_properties(
                data,
                &toy_net(),
                &nodes,
                &assignment,
                &names(&["M2"]),
                &|| false,
            )
            .unwrap();

            let m2 = &props[0];
            assert_eq!(m2.degree, vec![None, None]);
            assert_eq!(m2.avg_weight, None);
            if data.is_some() {
                assert_eq!(m2.summary, Some(vec![None; 6]));
                assert_eq!(m2.contribution, Some(vec![None, None]));
                assert_eq!(m2.coherence, Some(None));
            } else {
                assert!(m2.summary.is_none());
            }
        }
    }

    #[test]
    fn data_properties_are_consistent() {
        let nodes = names(&["A", "B", "C", "D"]);
        let assignment = pairs(&[("A", "M1"), ("B", "M1"), ("C", "M1"), ("D", "M2")]);
        let data = Mat::from_fn(10, 4, |i, j| {
            let t = i as f64;
            t + ((i * (j + 2)) % 3) as f64 * 0.5
        });

        let props = network_properties(
            Some(&data),
            &toy_net(),
            &nodes,
            &assignment,
            &names(&["M1"]),
            &|| false,
        )
        .unwrap();

        let m1 = &props[0];
        let contribution = m1.contribution.as_ref().unwrap();
        let summary = m1.summary.as_ref().unwrap();
        assert_eq!(summary.len(), 10);
        assert!(summary.iter().all(Option::is_some));

        // members share a strong trend, so they all track the profile
        let nc: Vec<f64> = contribution.iter().map(|x| x.unwrap()).collect();
        assert!(nc.iter().all(|&c| c > 0.9));

        let coherence = m1.coherence.unwrap().unwrap();
        let expected = nc.iter().map(|c| c * c).sum::<f64>() / nc.len() as f64;
        assert_abs_diff_eq!(coherence, expected, epsilon = 1e-12);
    }

    #[test]
    fn interrupt_aborts() {
        let nodes = names(&["A", "B", "C", "D"]);
        let assignment = pairs(&[("A", "M1")]);
        let res = network_properties(
            None,
            &toy_net(),
            &nodes,
            &assignment,
            &names(&["M1"]),
            &|| true,
        );
        assert!(res.is_err());
    }
}
