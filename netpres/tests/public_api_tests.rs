use netpres::common::{Mat, STAT_NAMES};
use netpres::net_stats::*;
use netpres::*;

use approx::assert_abs_diff_eq;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use std::time::Duration;

fn names(xs: &[&str]) -> Vec<Box<str>> {
    xs.iter().map(|&x| Box::from(x)).collect()
}

fn pairs(xs: &[(&str, &str)]) -> Vec<(Box<str>, Box<str>)> {
    xs.iter().map(|&(a, b)| (a.into(), b.into())).collect()
}

#[test]
fn four_node_weighted_degree() {
    let mut net = Mat::zeros(4, 4);
    for &(i, j, w) in &[(0, 1, 2.0), (0, 2, 4.0), (1, 2, 6.0)] {
        net[(i, j)] = w;
        net[(j, i)] = w;
    }

    let wd = weighted_degree(&net, &SortedIndex::new(&[0, 1, 2]));
    assert_eq!(wd.as_slice(), &[6.0, 8.0, 10.0]);
    assert_eq!(average_edge_weight(&wd), Some(8.0));

    // same nodes, different order
    let wd = weighted_degree(&net, &SortedIndex::new(&[2, 0, 1]));
    assert_eq!(wd.as_slice(), &[10.0, 6.0, 8.0]);
}

#[test]
fn preservation_of_a_shuffled_copy() {
    let mut rng = SmallRng::seed_from_u64(17);
    let n_samples = 30;
    let node_names = names(&["a", "b", "c", "d", "e", "f"]);

    let factor: Vec<f64> = (0..n_samples)
        .map(|_| StandardNormal.sample(&mut rng))
        .collect();
    let data = Mat::from_fn(n_samples, 6, |i, j| {
        let noise: f64 = StandardNormal.sample(&mut rng);
        if j < 3 {
            factor[i] + 0.3 * noise
        } else {
            noise
        }
    });
    let corr = {
        use matrix_util::traits::MatOps;
        data.column_correlation()
    };
    let net = corr.map(|c| c.abs());

    // the test dataset lists the same nodes in reverse order
    let rev: Vec<usize> = (0..6).rev().collect();
    let test_data = data.select_columns(&rev);
    let test_corr = corr.select_rows(&rev).select_columns(&rev);
    let test_net = net.select_rows(&rev).select_columns(&rev);
    let test_names: Vec<Box<str>> = rev.iter().map(|&j| node_names[j].clone()).collect();

    let assignment = pairs(&[
        ("a", "tight"),
        ("b", "tight"),
        ("c", "tight"),
        ("d", "loose"),
        ("e", "loose"),
        ("f", "loose"),
    ]);
    let modules = names(&["tight", "loose"]);

    let input = PreservationInput {
        discovery: Dataset {
            data: &data,
            corr: &corr,
            net: &net,
            node_names: &node_names,
        },
        test: Dataset {
            data: &test_data,
            corr: &test_corr,
            net: &test_net,
            node_names: &test_names,
        },
        assignment: &assignment,
        modules: &modules,
    };
    let args = PreservationArgs {
        n_perm: 20,
        n_threads: 2,
        null_hypothesis: NullHypothesis::All,
        seed: Some(1),
        poll_interval: Duration::from_millis(1),
        ..Default::default()
    };

    let out = run_preservation(&input, &args, &|| false, &mut |_: &Progress| {}).unwrap();
    assert_eq!(out.stat_names.len(), STAT_NAMES.len());

    // node order does not matter: the copy is perfectly preserved
    for r in 0..2 {
        assert_abs_diff_eq!(out.observed[(r, 2)].unwrap(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(out.observed[(r, 3)].unwrap(), 1.0, epsilon = 1e-10);
    }
    assert!(out.observed[(0, 1)].unwrap() > out.observed[(1, 1)].unwrap());
}
