use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Field separator: either a literal string or any of several chars
pub enum Delimiter {
    Str(String),
    Chars(Vec<char>),
}

impl From<&str> for Delimiter {
    fn from(s: &str) -> Self {
        Delimiter::Str(s.to_string())
    }
}

impl From<char> for Delimiter {
    fn from(c: char) -> Self {
        Delimiter::Chars(vec![c])
    }
}

impl From<Vec<char>> for Delimiter {
    fn from(chars: Vec<char>) -> Self {
        Delimiter::Chars(chars)
    }
}

impl<const N: usize> From<&[char; N]> for Delimiter {
    fn from(chars: &[char; N]) -> Self {
        Delimiter::Chars(chars.to_vec())
    }
}

impl Delimiter {
    fn split(&self, line: &str) -> Vec<Box<str>> {
        match self {
            Delimiter::Str(s) => line.split(s.as_str()).map(Box::from).collect(),
            Delimiter::Chars(chars) => line.split(chars.as_slice()).map(Box::from).collect(),
        }
    }
}

fn is_gz(file: &str) -> bool {
    Path::new(file).extension().and_then(|x| x.to_str()) == Some("gz")
}

/// Guess the field separator from a file name: comma for `.csv`
/// (and `.csv.gz`), tab otherwise
pub fn detect_delimiter(file_path: &str) -> Delimiter {
    let stripped = file_path.strip_suffix(".gz").unwrap_or(file_path);
    if stripped.ends_with(".csv") {
        Delimiter::from(",")
    } else {
        Delimiter::from("\t")
    }
}

/// All lines of a plain or gzipped file
pub fn read_lines(file: &str) -> anyhow::Result<Vec<Box<str>>> {
    open_buf_reader(file)?
        .lines()
        .map(|x| -> anyhow::Result<Box<str>> {
            Ok(x.map_err(|e| anyhow::anyhow!("{}: {}", file, e))?.into_boxed_str())
        })
        .collect()
}

/// One line per item; a closed pipe (e.g. `| head`) ends quietly
pub fn write_lines<T: std::fmt::Display>(lines: &[T], file: &str) -> anyhow::Result<()> {
    let mut buf = open_buf_writer(file)?;
    for line in lines {
        match writeln!(buf, "{}", line) {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
            other => other?,
        }
    }
    buf.flush()?;
    Ok(())
}

/// Words of every non-blank line plus the header
pub struct ReadLinesOut<T: Send> {
    pub lines: Vec<Vec<T>>,
    pub header: Vec<Box<str>>,
}

/// Split every line into words, skipping blank lines and comment
/// lines (`#` or `%`).
///
/// * `file` - plain or gzipped
/// * `delim` - field separator
/// * `hdr_line` - which of the kept lines is the header; negative
///   for none. Lines before it are dropped.
pub fn read_lines_of_words_delim(
    file: &str,
    delim: impl Into<Delimiter>,
    hdr_line: i64,
) -> anyhow::Result<ReadLinesOut<Box<str>>> {
    let delim = delim.into();

    let mut kept: Vec<Box<str>> = vec![];
    for (i, line) in open_buf_reader(file)?.lines().enumerate() {
        let line = line.map_err(|e| anyhow::anyhow!("{}: line {}: {}", file, i + 1, e))?;
        let line = line.trim_end_matches('\r');
        if !(line.is_empty() || line.starts_with('#') || line.starts_with('%')) {
            kept.push(line.into());
        }
    }

    let (header, body) = match usize::try_from(hdr_line) {
        Ok(h) if h < kept.len() => (delim.split(&kept[h]), &kept[(h + 1)..]),
        Ok(_) => anyhow::bail!("{}: no header line {}", file, hdr_line),
        Err(_) => (vec![], &kept[..]),
    };

    // order is kept by the indexed parallel iterator
    let lines = body.par_iter().map(|s| delim.split(s)).collect();

    Ok(ReadLinesOut { lines, header })
}

/// Buffered reader, decompressing `.gz` files
pub fn open_buf_reader(file: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let f = File::open(file).map_err(|e| anyhow::anyhow!("failed to open {}: {}", file, e))?;
    if is_gz(file) {
        Ok(Box::new(BufReader::new(GzDecoder::new(f))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

/// Buffered writer, compressing `.gz` files; `stdout` and `stderr`
/// go to the standard streams
pub fn open_buf_writer(file: &str) -> anyhow::Result<Box<dyn Write>> {
    if file.eq_ignore_ascii_case("stdout") {
        return Ok(Box::new(BufWriter::new(std::io::stdout())));
    }
    if file.eq_ignore_ascii_case("stderr") {
        return Ok(Box::new(BufWriter::new(std::io::stderr())));
    }

    let f = File::create(file).map_err(|e| anyhow::anyhow!("failed to create {}: {}", file, e))?;
    if is_gz(file) {
        let encoder = GzEncoder::new(f, flate2::Compression::default());
        Ok(Box::new(BufWriter::new(encoder)))
    } else {
        Ok(Box::new(BufWriter::new(f)))
    }
}

/// Make sure the directory of `file` exists
pub fn mkdir(file: &str) -> anyhow::Result<()> {
    match Path::new(file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(std::fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}

/// A fresh file name with `suffix` inside a new temporary directory
pub fn create_temp_dir_file(suffix: &str) -> anyhow::Result<std::path::PathBuf> {
    let dir = tempfile::tempdir()?.path().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile_in(dir)?
        .path()
        .to_owned();
    Ok(file)
}
