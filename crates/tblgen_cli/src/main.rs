//! tblgen-lex: Print the token stream of a TableGen-style source file.
//!
//! Usage:
//!   tblgen-lex [options] [FILE]
//!
//! Reads FILE (or stdin when FILE is absent or `-`), prints one token per
//! line until end of input, then prints any scan diagnostics to stderr.

use clap::{Parser as ClapParser, ValueEnum};
use miette::{IntoDiagnostic, WrapErr};
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tblgen_core::LineMap;
use tblgen_diagnostics::{messages, Diagnostic};
use tblgen_scanner::{ScanError, Scanner};
use tracing::{debug, info};

#[derive(ClapParser, Debug)]
#[command(name = "tblgen-lex", about = "Scan a TableGen-style source file and print its tokens")]
struct Cli {
    /// Source file to scan. Reads stdin when absent or `-`.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// What to do when an error token is produced.
    #[arg(long = "on-error", value_enum, default_value_t = OnError::Stop)]
    on_error: OnError,

    /// Output format for tokens.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only print diagnostics, not tokens.
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OnError {
    /// Stop at the first error token.
    Stop,
    /// Report the error and keep scanning.
    Skip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `Token{KIND, 'text', offset}` per line.
    Text,
    /// One JSON object per line.
    Json,
}

/// Outcome of one scan.
#[derive(Debug, Default, PartialEq, Eq)]
struct ScanSummary {
    tokens: usize,
    errors: usize,
    stopped_early: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{:?}", report);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> miette::Result<ExitCode> {
    let (name, source) = read_input(cli.file.as_ref())?;
    info!(file = %name, bytes = source.len(), "scanning");

    let mut scanner = Scanner::new(&source);
    let mut diagnostics = Vec::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = emit_tokens(&mut scanner, cli, &mut out, &mut diagnostics)
        .into_diagnostic()
        .wrap_err("Failed to write tokens")?;
    out.flush().into_diagnostic()?;
    debug!(?summary, "scan finished");

    if summary.stopped_early {
        diagnostics.push(Diagnostic::new(&messages::SCAN_STOPPED_AT_FIRST_ERROR, &[]));
    }
    report_diagnostics(diagnostics, &name, &source, io::stderr().is_terminal());

    Ok(if summary.errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Read the whole input, returning a display name and the bytes.
fn read_input(file: Option<&PathBuf>) -> miette::Result<(String, Vec<u8>)> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let bytes = std::fs::read(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to read '{}'", path.display()))?;
            Ok((path.display().to_string(), bytes))
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .into_diagnostic()
                .wrap_err("Failed to read stdin")?;
            Ok(("<stdin>".to_string(), bytes))
        }
    }
}

/// Drive the scanner to `EndOfInput` (or the first error under
/// `--on-error stop`), writing tokens to `out`.
///
/// Each error token's cause is turned into a diagnostic as it arrives, since
/// the scanner only remembers the latest one.
fn emit_tokens<W: Write>(
    scanner: &mut Scanner<'_>,
    cli: &Cli,
    out: &mut W,
    diagnostics: &mut Vec<Diagnostic>,
) -> io::Result<ScanSummary> {
    let mut summary = ScanSummary::default();
    loop {
        let token = scanner.next_token();
        summary.tokens += 1;

        if !cli.quiet {
            match cli.format {
                OutputFormat::Text => writeln!(out, "{}", token)?,
                OutputFormat::Json => {
                    serde_json::to_writer(&mut *out, &token).map_err(io::Error::from)?;
                    writeln!(out)?;
                }
            }
        }

        if token.is_end_of_input() {
            break;
        }
        if token.is_error() {
            summary.errors += 1;
            diagnostics.extend(scanner.last_error().map(ScanError::to_diagnostic));
            if cli.on_error == OnError::Stop {
                summary.stopped_early = !scanner.is_exhausted();
                break;
            }
        }
    }
    Ok(summary)
}

/// Print diagnostics to stderr with `file:line:column` locations.
fn report_diagnostics(diagnostics: Vec<Diagnostic>, name: &str, source: &[u8], use_color: bool) {
    let line_map = LineMap::new(source);
    let stderr = io::stderr();
    let mut err = stderr.lock();
    for diag in diagnostics {
        // Nothing useful to do if stderr is gone.
        let _ = write_diagnostic(&mut err, &diag.with_file(name), &line_map, use_color);
    }
}

fn write_diagnostic<W: Write>(
    out: &mut W,
    diag: &Diagnostic,
    line_map: &LineMap,
    use_color: bool,
) -> io::Result<()> {
    let location = match (&diag.file, diag.span) {
        (Some(file), Some(span)) => Some(format!("{}:{}", file, line_map.line_and_column_of(span.start))),
        (Some(file), None) => Some(file.clone()),
        (None, _) => None,
    };
    let category = diag.category.to_string();

    if use_color {
        let color = if diag.is_error() { RED } else { YELLOW };
        if let Some(location) = location {
            write!(out, "{}{}{}: ", CYAN, location, RESET)?;
        }
        writeln!(
            out,
            "{}{}{}{} {}TBL{}{}: {}",
            BOLD, color, category, RESET, CYAN, diag.code, RESET, diag.message_text
        )
    } else {
        if let Some(location) = location {
            write!(out, "{}: ", location)?;
        }
        writeln!(out, "{} TBL{}: {}", category, diag.code, diag.message_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tblgen-lex").chain(args.iter().copied())).unwrap()
    }

    fn scan_with_diagnostics(source: &str, args: &[&str]) -> (String, ScanSummary, Vec<Diagnostic>) {
        let cli = cli(args);
        let mut scanner = Scanner::from(source);
        let mut out = Vec::new();
        let mut diagnostics = Vec::new();
        let summary = emit_tokens(&mut scanner, &cli, &mut out, &mut diagnostics).unwrap();
        (String::from_utf8(out).unwrap(), summary, diagnostics)
    }

    fn scan(source: &str, args: &[&str]) -> (String, ScanSummary) {
        let (out, summary, _) = scan_with_diagnostics(source, args);
        (out, summary)
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.file, None);
        assert_eq!(cli.on_error, OnError::Stop);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_options() {
        let cli = cli(&["--on-error", "skip", "--format", "json", "-vv", "-q", "in.td"]);
        assert_eq!(cli.file, Some(PathBuf::from("in.td")));
        assert_eq!(cli.on_error, OnError::Skip);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }

    #[test]
    fn test_text_output_prints_every_token() {
        let (out, summary) = scan("foo\n3456 baz \"本ä\" 3 ", &[]);
        assert_eq!(
            out,
            "Token{IDENTIFIER, 'foo', 0}\n\
             Token{NUMBER, '3456', 4}\n\
             Token{IDENTIFIER, 'baz', 9}\n\
             Token{QUOTE, '\"本ä\"', 13}\n\
             Token{NUMBER, '3', 21}\n\
             Token{EOF, '', 23}\n"
        );
        assert_eq!(summary, ScanSummary { tokens: 6, errors: 0, stopped_early: false });
    }

    #[test]
    fn test_stop_on_first_error() {
        let (out, summary) = scan("a $ b", &[]);
        assert_eq!(out, "Token{IDENTIFIER, 'a', 0}\nToken{ERROR, '', 2}\n");
        assert_eq!(summary, ScanSummary { tokens: 2, errors: 1, stopped_early: true });
    }

    #[test]
    fn test_stop_on_trailing_error_is_not_early() {
        let (_, summary) = scan("a \"open", &[]);
        assert_eq!(summary, ScanSummary { tokens: 2, errors: 1, stopped_early: false });
    }

    #[test]
    fn test_skip_continues_past_errors() {
        let (out, summary) = scan("a $ b", &["--on-error", "skip"]);
        assert_eq!(out.lines().count(), 4);
        assert_eq!(summary, ScanSummary { tokens: 4, errors: 1, stopped_early: false });
    }

    #[test]
    fn test_skip_collects_one_diagnostic_per_error() {
        let (_, summary, diagnostics) = scan_with_diagnostics("$ a @ \"open", &["--on-error", "skip"]);
        assert_eq!(summary.errors, 3);
        let found: Vec<(u32, Option<usize>)> = diagnostics
            .iter()
            .map(|d| (d.code, d.span.map(|s| s.start)))
            .collect();
        assert_eq!(found, vec![(1127, Some(0)), (1127, Some(4)), (1002, Some(6))]);
    }

    #[test]
    fn test_stop_collects_only_the_first_diagnostic() {
        let (_, summary, diagnostics) = scan_with_diagnostics("$ @", &[]);
        assert!(summary.stopped_early);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message_text, "Invalid character '$'.");
    }

    #[test]
    fn test_json_output() {
        let (out, _) = scan("x=1", &["--format", "json"]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], r#"{"kind":"IDENTIFIER","text":"x","offset":0}"#);
        assert_eq!(lines[1], r#"{"kind":"EQUALS","text":"=","offset":1}"#);
        assert_eq!(lines[3], r#"{"kind":"EOF","text":"","offset":3}"#);
    }

    #[test]
    fn test_quiet_prints_nothing() {
        let (out, summary) = scan("a b c", &["--quiet"]);
        assert!(out.is_empty());
        assert_eq!(summary.tokens, 4);
    }

    #[test]
    fn test_write_diagnostic_with_line_and_column() {
        let source = b"ok\n  @";
        let mut scanner = Scanner::new(source);
        while !scanner.next_token().is_end_of_input() {}
        let diag = scanner.last_error().map(ScanError::to_diagnostic).unwrap();

        let mut out = Vec::new();
        write_diagnostic(&mut out, &diag.with_file("a.td"), &LineMap::new(source), false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a.td:2:3: error TBL1127: Invalid character '@'.\n"
        );
    }

    #[test]
    fn test_write_warning_without_span() {
        let diag = Diagnostic::new(&messages::SCAN_STOPPED_AT_FIRST_ERROR, &[]).with_file("<stdin>");
        let mut out = Vec::new();
        write_diagnostic(&mut out, &diag, &LineMap::new(b""), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<stdin>: warning TBL6001: "));
    }
}
