use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use resty_shape::{MatchResult, match_bytes, match_partial};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Checks that a JSON document satisfies an expected shape.
#[derive(Parser)]
struct Args {
    /// Actual document, `-` for standard input.
    actual: PathBuf,
    /// Expected document, or the literal fragment with `--partial`.
    expected: PathBuf,
    /// Look for the expected bytes verbatim instead of matching structure.
    #[clap(long, env = "RESTY_PARTIAL")]
    partial: bool,
}

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_env("RESTY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let outcome = run(&args)?;
    Ok(report(&outcome, &mut io::stdout(), &mut io::stderr())?)
}

/// Reads both documents and compares them.
fn run(args: &Args) -> Result<MatchResult> {
    let actual = read_input(&args.actual)?;
    let expected = fs::read(&args.expected)
        .with_context(|| format!("reading expected document {}", args.expected.display()))?;

    debug!(
        actual = actual.len(),
        expected = expected.len(),
        partial = args.partial,
        "comparing documents"
    );
    Ok(if args.partial {
        match_partial(&actual, &expected)
    } else {
        match_bytes(&actual, &expected)
    })
}

/// Prints the verdict: `ok` on stdout, or the mismatch on stderr.
fn report(
    outcome: &MatchResult,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<ExitCode> {
    match outcome {
        Ok(()) => {
            writeln!(out, "ok")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(mismatch) => {
            writeln!(err, "{mismatch}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("reading actual document from stdin")?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("reading actual document {}", path.display()))
}
