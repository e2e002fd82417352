//! Line-oriented driver for a kd-index tree.
//!
//! Commands are read from standard input as whitespace-separated tokens:
//!
//! - `LOAD <file>` inserts every point of a point file
//! - `NN <x0> .. <xk>` prints the stored point nearest to the target
//! - `RS <lo0> <hi0> .. <lok> <hik>` prints every stored point within the bounds
//!
//! Any other command ends the session.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use kd_index::kdtree::{KDTree, KDTreeIndex};
use kd_index::Point;

/// Splits input lines into tokens on demand, so commands may span lines.
struct Tokens<R> {
    lines: io::Lines<R>,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            match self.lines.next() {
                Some(line) => self
                    .pending
                    .extend(line?.split_whitespace().map(str::to_owned)),
                None => return Ok(None),
            }
        }
    }

    fn next_int(&mut self) -> Result<i32> {
        let token = self
            .next_token()?
            .context("unexpected end of input while reading a coordinate")?;
        token
            .parse()
            .with_context(|| format!("invalid coordinate {token:?}"))
    }
}

fn write_point<W: Write>(out: &mut W, point: &Point<i32>) -> io::Result<()> {
    for c in point.coords() {
        write!(out, "{} ", c)?;
    }
    writeln!(out)
}

fn main() -> Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), BufWriter::new(stdout.lock()))
}

/// Execute commands read from `reader` until the input ends or an unknown command is seen,
/// writing query results to `out`.
fn run<R: BufRead, W: Write>(reader: R, mut out: W) -> Result<()> {
    let mut tokens = Tokens::new(reader);
    let mut tree = KDTree::<i32>::new();

    while let Some(command) = tokens.next_token()? {
        match command.as_str() {
            "LOAD" => {
                let path = tokens.next_token()?.context("LOAD needs a file name")?;
                let file = File::open(&path).with_context(|| format!("can't open {path}"))?;
                let summary = tree
                    .load_into(file)
                    .with_context(|| format!("failed to load {path}"))?;
                log::info!(
                    "{}: {} points read, {} inserted",
                    path,
                    summary.read,
                    summary.inserted
                );
            }
            "NN" => {
                let dims = tree.dims().context("NN before any points were loaded")?;
                let target = (0..dims)
                    .map(|_| tokens.next_int())
                    .collect::<Result<Vec<_>>>()?;
                match tree.nearest(&target)? {
                    Some(point) => write_point(&mut out, point)?,
                    None => log::warn!("NN on an empty tree"),
                }
            }
            "RS" => {
                let dims = tree.dims().context("RS before any points were loaded")?;
                let mut lower = Vec::with_capacity(dims);
                let mut upper = Vec::with_capacity(dims);
                for _ in 0..dims {
                    lower.push(tokens.next_int()?);
                    upper.push(tokens.next_int()?);
                }
                for point in tree.range_iter(&lower, &upper)? {
                    write_point(&mut out, point)?;
                }
            }
            _ => break,
        }
        out.flush()?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    /// Write `contents` to a point file unique to this test process.
    fn point_file(name: &str, contents: &str) -> PathBuf {
        let file_name = format!("kd-index-cli-{}-{name}.txt", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn session(commands: &str) -> Result<String> {
        let mut out = Vec::new();
        run(commands.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn load_and_query() {
        let path = point_file("scenario", "4 2\n5 5\n3 2\n8 1\n2 9\n");
        let output = session(&format!(
            "LOAD {}\nNN 4 4\nNN 8\n2\nRS 2 6 1 9\n",
            path.display()
        ))
        .unwrap();
        fs::remove_file(&path).unwrap();

        // bounds are interleaved per axis: x in [2, 6], y in [1, 9]
        assert_eq!(output, "5 5 \n8 1 \n5 5 \n2 9 \n3 2 \n");
    }

    #[test]
    fn unknown_command_ends_session() {
        let path = point_file("unknown", "2 1\n10\n20\n");
        let output = session(&format!("LOAD {}\nNN 12\nEXIT\nNN 19\n", path.display())).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(output, "10 \n");
    }

    #[test]
    fn nearest_on_empty_file_prints_nothing() {
        let path = point_file("empty", "0 2\n");
        let output = session(&format!(
            "LOAD {}\nNN 1 1\nRS 0 9 0 9\n",
            path.display()
        ))
        .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(output, "");
    }

    #[test]
    fn query_before_load_fails() {
        assert!(session("NN 1 1\n").is_err());
        assert!(session("RS 0 1 0 1\n").is_err());
        assert_eq!(session("").unwrap(), "");
    }

    #[test]
    fn missing_file_fails() {
        let err = session("LOAD does/not/exist.txt\n").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.txt"));
    }

    #[test]
    fn truncated_query_fails() {
        let path = point_file("truncated", "1 2\n1 1\n");
        let result = session(&format!("LOAD {}\nNN 1\n", path.display()));
        fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }
}
