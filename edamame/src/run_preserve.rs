use crate::common::*;
use crate::input::*;
use crate::output::*;

use clap::Parser;
use netpres::{run_preservation, NullHypothesis, PreservationArgs, PreservationInput, Progress};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
pub struct PreserveArgs {
    /// discovery data matrix (samples × nodes)
    #[arg(long, required = true)]
    disc_data: Box<str>,

    /// discovery network (nodes × nodes edge weights)
    #[arg(long, required = true)]
    disc_net: Box<str>,

    /// discovery correlation matrix (nodes × nodes); computed from
    /// the data if omitted
    #[arg(long)]
    disc_corr: Option<Box<str>>,

    /// test data matrix (samples × nodes)
    #[arg(long, required = true)]
    test_data: Box<str>,

    /// test network (nodes × nodes edge weights)
    #[arg(long, required = true)]
    test_net: Box<str>,

    /// test correlation matrix (nodes × nodes); computed from the
    /// data if omitted
    #[arg(long)]
    test_corr: Option<Box<str>>,

    /// module assignment file; each line has a discovery node name
    /// and its module label
    #[arg(long, short = 'm', required = true)]
    modules: Box<str>,

    /// modules to analyse (comma-separated); all modules by default
    #[arg(long, value_delimiter(','))]
    module: Vec<Box<str>>,

    /// number of permutations
    #[arg(long, short = 'n', default_value_t = 10_000)]
    n_perm: usize,

    /// number of worker threads; defaults to the number of cores
    #[arg(long, short = 't')]
    threads: Option<usize>,

    /// permutation pool: `overlap` (assigned nodes present in the
    /// test dataset) or `all` (every test node)
    #[arg(long, default_value = "overlap")]
    null: NullHypothesis,

    /// random seed; worker `w` uses `seed + w`
    #[arg(long)]
    seed: Option<u64>,

    /// output file prefix
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

/// Number of worker threads: requested or all cores, never more than
/// there are permutations
fn worker_threads(requested: Option<usize>, n_perm: usize) -> anyhow::Result<usize> {
    let max_threads = num_cpus::get();
    let n_threads = match requested {
        Some(0) => anyhow::bail!("need at least one thread"),
        Some(t) if t > max_threads => {
            warn!("{} threads requested, but only {} cores", t, max_threads);
            max_threads
        }
        Some(t) => t,
        None => max_threads,
    };
    Ok(n_threads.min(n_perm).max(1))
}

/// Run module preservation analysis
pub fn run_preserve(args: &PreserveArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    if args.n_perm == 0 {
        anyhow::bail!("need at least one permutation");
    }
    let n_threads = worker_threads(args.threads, args.n_perm)?;

    info!("Reading the discovery dataset...");
    let disc = read_dataset(&args.disc_data, &args.disc_net, args.disc_corr.as_deref())?;

    info!("Reading the test dataset...");
    let test = read_dataset(&args.test_data, &args.test_net, args.test_corr.as_deref())?;

    let disc_nodes: HashSet<&str> = disc.nodes.iter().map(|x| x.as_ref()).collect();
    let modules = read_modules(&args.modules, &args.module, |x| disc_nodes.contains(x))?;
    info!(
        "{} modules over {} assigned nodes",
        modules.modules.len(),
        modules.assignment.len()
    );

    let interrupt = interrupt_on_ctrlc()?;

    let input = PreservationInput {
        discovery: disc.dataset(),
        test: test.dataset(),
        assignment: &modules.assignment,
        modules: &modules.modules,
    };
    let pres_args = PreservationArgs {
        n_perm: args.n_perm,
        n_threads,
        null_hypothesis: args.null,
        verbose: args.verbose,
        seed: args.seed,
        poll_interval: Duration::from_millis(100),
    };

    let out = run_preservation(
        &input,
        &pres_args,
        &|| interrupt.is_cancelled(),
        &mut |p: &Progress| debug!("{}/{} permutations", p.completed, p.total),
    )?;

    if out.cancelled {
        warn!(
            "only {} of {} permutations were completed",
            out.num_completed_permutations(),
            args.n_perm
        );
    }

    info!("Writing down the results...");
    write_stat_table(
        &out.observed,
        &out.modules,
        &out.stat_names,
        &format!("{}.observed.tsv", args.out),
    )?;
    write_null_cube(
        &out.nulls,
        &out.modules,
        &out.stat_names,
        &out.perm_names,
        &format!("{}.nulls.tsv.gz", args.out),
    )?;
    write_stat_table(
        &out.p_values(),
        &out.modules,
        &out.stat_names,
        &format!("{}.pvalues.tsv", args.out),
    )?;

    info!("done");
    Ok(())
}
