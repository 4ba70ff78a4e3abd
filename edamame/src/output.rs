use crate::common::*;
use matrix_util::common_io::{mkdir, open_buf_writer};
use ndarray::{Array2, Array3};
use std::io::Write;

fn fmt_stat(x: &Stat) -> String {
    match x {
        Some(v) => v.to_string(),
        None => "NA".to_string(),
    }
}

/// modules × statistics table with a `module` header column
pub fn write_stat_table(
    table: &Array2<Stat>,
    modules: &[Box<str>],
    stat_names: &[Box<str>],
    file: &str,
) -> anyhow::Result<()> {
    mkdir(file)?;
    let mut buf = open_buf_writer(file)?;

    let header: Vec<&str> = std::iter::once("module")
        .chain(stat_names.iter().map(|x| x.as_ref()))
        .collect();
    writeln!(buf, "{}", header.join("\t"))?;

    for (module, row) in modules.iter().zip(table.rows()) {
        let values: Vec<String> = row.iter().map(fmt_stat).collect();
        writeln!(buf, "{}\t{}", module, values.join("\t"))?;
    }
    buf.flush()?;
    info!("wrote {}", file);
    Ok(())
}

/// The null cube in long format: module, statistic, permutation,
/// value
pub fn write_null_cube(
    nulls: &Array3<Stat>,
    modules: &[Box<str>],
    stat_names: &[Box<str>],
    perm_names: &[Box<str>],
    file: &str,
) -> anyhow::Result<()> {
    mkdir(file)?;
    let mut buf = open_buf_writer(file)?;
    writeln!(buf, "module\tstatistic\tpermutation\tvalue")?;

    for ((r, s, p), x) in nulls.indexed_iter() {
        writeln!(
            buf,
            "{}\t{}\t{}\t{}",
            modules[r],
            stat_names[s],
            perm_names[p],
            fmt_stat(x)
        )?;
    }
    buf.flush()?;
    info!("wrote {}", file);
    Ok(())
}

/// Pretty-printed JSON
pub fn write_json<T: serde::Serialize>(value: &T, file: &str) -> anyhow::Result<()> {
    mkdir(file)?;
    let mut buf = open_buf_writer(file)?;
    serde_json::to_writer_pretty(&mut buf, value)?;
    writeln!(buf)?;
    buf.flush()?;
    info!("wrote {}", file);
    Ok(())
}
