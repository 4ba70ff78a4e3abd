use crate::common_io::{read_lines_of_words_delim, write_lines, Delimiter};
use crate::traits::*;
pub use nalgebra::{DMatrix, DVector};

fn parse_field(word: &str, file: &str) -> anyhow::Result<f64> {
    match word.trim() {
        "NA" | "NaN" | "nan" | "" => Ok(f64::NAN),
        x => x
            .parse::<f64>()
            .map_err(|e| anyhow::anyhow!("{}: cannot parse '{}': {}", file, x, e)),
    }
}

impl IoOps for DMatrix<f64> {
    type Scalar = f64;
    type Mat = Self;

    fn read_file_delim(
        file: &str,
        delim: impl Into<Delimiter>,
        skip: Option<usize>,
    ) -> anyhow::Result<Self::Mat> {
        let hdr_line = skip.map(|s| s as i64).unwrap_or(-1);
        let lines = read_lines_of_words_delim(file, delim, hdr_line)?.lines;

        if lines.is_empty() {
            anyhow::bail!("No data in file {}", file);
        }

        let ncols = lines[0].len();
        let nrows = lines.len();
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, words) in lines.iter().enumerate() {
            if words.len() != ncols {
                anyhow::bail!(
                    "{}: line {} has {} fields, expected {}",
                    file,
                    i + 1,
                    words.len(),
                    ncols
                );
            }
            for w in words {
                data.push(parse_field(w, file)?);
            }
        }

        Ok(DMatrix::<f64>::from_row_iterator(nrows, ncols, data))
    }

    fn read_names_delim(
        file: &str,
        delim: impl Into<Delimiter>,
    ) -> anyhow::Result<MatWithNames<Self::Mat>> {
        let out = read_lines_of_words_delim(file, delim, 0)?;

        let mut cols = out.header;
        let lines = out.lines;

        if lines.is_empty() {
            anyhow::bail!("No data in file {}", file);
        }

        let nfields = lines[0].len();
        if nfields < 2 {
            anyhow::bail!("{}: expected a row name followed by values", file);
        }
        let ncols = nfields - 1;

        // the header may or may not carry a name for the row-name column
        if cols.len() == nfields {
            cols.remove(0);
        }
        if cols.len() != ncols {
            anyhow::bail!(
                "{}: {} column names for {} columns",
                file,
                cols.len(),
                ncols
            );
        }

        let nrows = lines.len();
        let mut rows = Vec::with_capacity(nrows);
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, words) in lines.into_iter().enumerate() {
            if words.len() != nfields {
                anyhow::bail!(
                    "{}: row {} has {} fields, expected {}",
                    file,
                    i + 1,
                    words.len(),
                    nfields
                );
            }
            let mut words = words.into_iter();
            rows.extend(words.next());
            for w in words {
                data.push(parse_field(&w, file)?);
            }
        }

        Ok(MatWithNames {
            rows,
            cols,
            mat: DMatrix::<f64>::from_row_iterator(nrows, ncols, data),
        })
    }

    fn write_file_delim(&self, file: &str, delim: &str) -> anyhow::Result<()> {
        let lines = self
            .row_iter()
            .map(|row| {
                row.iter()
                    .map(|x| format!("{}", x))
                    .collect::<Vec<String>>()
                    .join(delim)
                    .into_boxed_str()
            })
            .collect::<Vec<_>>();
        write_lines(&lines, file)
    }

    fn write_names_delim(
        &self,
        file: &str,
        delim: &str,
        rows: &[Box<str>],
        cols: &[Box<str>],
    ) -> anyhow::Result<()> {
        if rows.len() != self.nrows() || cols.len() != self.ncols() {
            anyhow::bail!(
                "names ({} x {}) do not match the matrix ({} x {})",
                rows.len(),
                cols.len(),
                self.nrows(),
                self.ncols()
            );
        }

        let mut lines = Vec::with_capacity(self.nrows() + 1);
        lines.push(cols.join(delim).into_boxed_str());
        for (name, row) in rows.iter().zip(self.row_iter()) {
            let mut line = name.to_string();
            for x in row.iter() {
                line.push_str(delim);
                line.push_str(&format!("{}", x));
            }
            lines.push(line.into_boxed_str());
        }
        write_lines(&lines, file)
    }
}
