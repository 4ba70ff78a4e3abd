use crate::common::*;
use crate::input::*;
use crate::output::*;

use clap::Parser;
use netpres::{network_properties, ModuleProperties};
use serde::Serialize;

#[derive(Parser, Debug, Clone)]
pub struct PropertiesArgs {
    /// network (nodes × nodes edge weights)
    #[arg(long, required = true)]
    net: Box<str>,

    /// data matrix (samples × nodes); adds summary profiles, node
    /// contributions and coherence
    #[arg(long)]
    data: Option<Box<str>>,

    /// module assignment file; may name nodes absent from the network
    #[arg(long, short = 'm', required = true)]
    modules: Box<str>,

    /// modules to report (comma-separated); all modules by default
    #[arg(long, value_delimiter(','))]
    module: Vec<Box<str>>,

    /// output JSON file
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Serialize)]
struct PropertiesReport<'a> {
    /// order of every `summary` vector
    samples: Option<&'a [Box<str>]>,
    modules: &'a [ModuleProperties],
}

/// Report module properties within one dataset
pub fn run_properties(args: &PropertiesArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let net = read_named_matrix(&args.net)?;
    let nodes = check_square(&net, &args.net)?;

    let data = match args.data.as_deref() {
        Some(file) => Some(read_data_for(file, &nodes)?),
        None => None,
    };

    let modules = read_modules(&args.modules, &args.module, |_| true)?;
    let interrupt = interrupt_on_ctrlc()?;

    let props = network_properties(
        data.as_ref().map(|x| &x.mat),
        &net.mat,
        &nodes,
        &modules.assignment,
        &modules.modules,
        &|| interrupt.is_cancelled(),
    )?;

    for p in &props {
        info!(
            "module {}: {} of {} nodes present",
            p.module,
            p.num_present(),
            p.members.len()
        );
    }

    write_json(
        &PropertiesReport {
            samples: data.as_ref().map(|x| x.rows.as_slice()),
            modules: &props,
        },
        &args.out,
    )?;
    Ok(())
}
