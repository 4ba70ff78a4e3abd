use crate::common::*;
use matrix_util::common_io::detect_delimiter;
use matrix_util::membership::Membership;
use matrix_util::traits::{IoOps, MatOps, MatWithNames};

/// One dataset read from disk and checked for consistency
pub struct DatasetFiles {
    /// samples × nodes
    pub data: Mat,
    pub corr: Mat,
    pub net: Mat,
    pub nodes: Vec<Box<str>>,
    pub samples: Vec<Box<str>>,
}

impl DatasetFiles {
    pub fn dataset(&self) -> netpres::Dataset<'_> {
        netpres::Dataset {
            data: &self.data,
            corr: &self.corr,
            net: &self.net,
            node_names: &self.nodes,
        }
    }
}

pub fn read_named_matrix(file: &str) -> anyhow::Result<MatWithNames<Mat>> {
    let ret = Mat::read_names_delim(file, detect_delimiter(file))?;
    info!(
        "read a {} x {} matrix from {}",
        ret.mat.nrows(),
        ret.mat.ncols(),
        file
    );
    Ok(ret)
}

/// A node × node matrix must be square with identical row and
/// column names; returns the node names
pub fn check_square(x: &MatWithNames<Mat>, file: &str) -> anyhow::Result<Vec<Box<str>>> {
    if x.mat.nrows() != x.mat.ncols() {
        anyhow::bail!(
            "{}: expected a square matrix, found {} x {}",
            file,
            x.mat.nrows(),
            x.mat.ncols()
        );
    }
    if x.rows != x.cols {
        anyhow::bail!("{}: row names differ from column names", file);
    }
    if x.mat.iter().any(|v| !v.is_finite()) {
        anyhow::bail!("{}: contains missing or non-finite values", file);
    }
    Ok(x.cols.clone())
}

/// Read the network, optionally the data (samples × nodes) and the
/// correlation matrix, which defaults to the correlation of the
/// data columns
pub fn read_dataset(
    data_file: &str,
    net_file: &str,
    corr_file: Option<&str>,
) -> anyhow::Result<DatasetFiles> {
    let net = read_named_matrix(net_file)?;
    let nodes = check_square(&net, net_file)?;

    let data = read_data_for(data_file, &nodes)?;

    let corr = match corr_file {
        Some(corr_file) => {
            let corr = read_named_matrix(corr_file)?;
            if check_square(&corr, corr_file)? != nodes {
                anyhow::bail!("{}: nodes differ from those of {}", corr_file, net_file);
            }
            corr.mat
        }
        None => {
            info!("correlating the columns of {}", data_file);
            data.mat.column_correlation()
        }
    };

    Ok(DatasetFiles {
        data: data.mat,
        corr,
        net: net.mat,
        nodes,
        samples: data.rows,
    })
}

/// Read a samples × nodes data matrix whose columns must match `nodes`
pub fn read_data_for(data_file: &str, nodes: &[Box<str>]) -> anyhow::Result<MatWithNames<Mat>> {
    let data = read_named_matrix(data_file)?;
    if data.cols != nodes {
        anyhow::bail!(
            "{}: columns must list the network nodes in the same order",
            data_file
        );
    }
    if data.mat.nrows() < 2 {
        anyhow::bail!("{}: need at least two samples", data_file);
    }
    Ok(data)
}

/// Node → module assignment and the modules to analyse
pub struct ModuleInput {
    pub assignment: Vec<(Box<str>, Box<str>)>,
    pub modules: Vec<Box<str>>,
}

/// * `keep_node` - assignment entries whose node fails this are
///   dropped (with a warning)
/// * `requested` - modules to analyse; all modules if empty
pub fn read_modules(
    module_file: &str,
    requested: &[Box<str>],
    keep_node: impl Fn(&str) -> bool,
) -> anyhow::Result<ModuleInput> {
    let membership = Membership::from_file(module_file, 0, 1)?;
    let kept = membership.filter_keys(&keep_node);
    if kept.len() < membership.len() {
        warn!(
            "{} assigned nodes are not in the discovery dataset and were dropped",
            membership.len() - kept.len()
        );
    }

    let known = kept.groups();
    let modules = if requested.is_empty() {
        known
    } else {
        for m in requested {
            if !known.contains(m) {
                anyhow::bail!("module {} is not in {}", m, module_file);
            }
        }
        requested.to_vec()
    };

    if modules.is_empty() {
        anyhow::bail!("no module to analyse in {}", module_file);
    }

    Ok(ModuleInput {
        assignment: kept.pairs().to_vec(),
        modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_util::common_io::{create_temp_dir_file, write_lines};

    fn temp_file(suffix: &str, lines: &[&str]) -> String {
        let file = create_temp_dir_file(suffix).unwrap();
        let file = file.to_str().unwrap().to_string();
        let lines: Vec<Box<str>> = lines.iter().map(|&x| x.into()).collect();
        write_lines(&lines, &file).unwrap();
        file
    }

    #[test]
    fn dataset_with_default_correlation() {
        let net = temp_file(
            ".tsv",
            &["\ta\tb\tc", "a\t0\t1\t2", "b\t1\t0\t3", "c\t2\t3\t0"],
        );
        let data = temp_file(
            ".csv",
            &[",a,b,c", "s1,1,2,0", "s2,2,4,1", "s3,3,5,0", "s4,4,9,1"],
        );

        let ds = read_dataset(&data, &net, None).unwrap();
        assert_eq!(ds.nodes.len(), 3);
        assert_eq!(ds.samples.len(), 4);
        assert_eq!(ds.corr.nrows(), 3);
        approx::assert_abs_diff_eq!(ds.corr[(0, 0)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_nodes_are_rejected() {
        let net = temp_file(".tsv", &["\ta\tb", "a\t0\t1", "b\t1\t0"]);
        let data = temp_file(".tsv", &["\tb\ta", "s1\t1\t2", "s2\t2\t1"]);
        assert!(read_dataset(&data, &net, None).is_err());

        let not_square = temp_file(".tsv", &["\ta\tb", "a\t0\t1"]);
        assert!(read_dataset(&data, &not_square, None).is_err());
    }

    #[test]
    fn modules_follow_the_file() {
        let file = temp_file(".tsv", &["a\tM1", "b\tM2", "z\tM1", "c\tM1"]);

        let input = read_modules(&file, &[], |x| x != "z").unwrap();
        assert_eq!(input.modules, vec![Box::from("M1"), Box::from("M2")]);
        assert_eq!(input.assignment.len(), 3);

        assert!(read_modules(&file, &[Box::from("M3")], |_| true).is_err());
    }
}
