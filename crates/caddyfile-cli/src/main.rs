//! `caddy-ls`: Caddyfile language server and checker.
//!
//!   caddy-ls                      - language server on stdio
//!   caddy-ls lsp                  - same, explicitly
//!   caddy-ls check Caddyfile      - report problems, exit non-zero on errors
//!   caddy-ls tree Caddyfile       - print the parsed block outline

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use caddyfile_analysis::{Severity, analyze};
use clap::{Parser, Subcommand};
use eyre::WrapErr;
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};

const EXIT_SUCCESS: i32 = 0;
const EXIT_PARSE_ERROR: i32 = 1;
const EXIT_DIAGNOSTIC_ERROR: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

#[derive(Debug, Parser)]
#[command(name = "caddy-ls", version, about = "Language server for Caddyfiles")]
struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the language server on stdio (the default)
    Lsp,
    /// Parse and analyze a Caddyfile, reporting problems on stderr
    Check {
        /// Caddyfile to check ('-' for stdin)
        file: PathBuf,
    },
    /// Print the outline of a parsed Caddyfile
    Tree {
        /// Caddyfile to print ('-' for stdin)
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // The subscriber isn't installed yet, so config problems are held back
    // and reported once it is.
    let (config_level, config_warning) = match caddyfile_lsp::load_config() {
        Ok(config) => match config.and_then(|c| c.log_level) {
            Some(level) => match LevelFilter::from_str(&level) {
                Ok(level) => (Some(level), None),
                Err(_) => (None, Some(format!("ignoring invalid log_level {level:?} in config"))),
            },
            None => (None, None),
        },
        Err(e) => (None, Some(e.to_string())),
    };

    let level = cli.log_level.or(config_level).unwrap_or(LevelFilter::WARN);
    caddyfile_lsp::init_logging(level);
    if let Some(message) = config_warning {
        warn!("{message}; using defaults");
    }
    debug!(%level, "logging initialized");

    let code = match cli.command.unwrap_or(Command::Lsp) {
        Command::Lsp => match run_lsp() {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("error: {e:?}");
                EXIT_IO_ERROR
            }
        },
        Command::Check { file } => match read_input(&file) {
            Ok(source) => check(&display_name(&file), &source, io::stderr()),
            Err(e) => {
                eprintln!("error: {e:?}");
                EXIT_IO_ERROR
            }
        },
        Command::Tree { file } => match read_input(&file) {
            Ok(source) => {
                print!("{}", tree(&source));
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e:?}");
                EXIT_IO_ERROR
            }
        },
    };
    std::process::exit(code);
}

fn run_lsp() -> eyre::Result<()> {
    let rt = tokio::runtime::Runtime::new().wrap_err("failed to start the async runtime")?;
    rt.block_on(caddyfile_lsp::run())
}

fn read_input(file: &Path) -> eyre::Result<String> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(file).wrap_err_with(|| format!("failed to read {}", file.display()))
}

fn display_name(file: &Path) -> String {
    if file.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        file.display().to_string()
    }
}

/// Report every parse error and diagnostic to `out`, returning the exit code.
fn check<W: io::Write>(filename: &str, source: &str, mut out: W) -> i32 {
    let (file, errors) = caddyfile_parse::parse(source);
    let diagnostics = analyze(&file);
    debug!(
        parse_errors = errors.len(),
        diagnostics = diagnostics.len(),
        "checked {filename}"
    );

    for error in &errors {
        error.write_report(filename, source, &mut out);
    }
    for diagnostic in &diagnostics {
        diagnostic.write_report(filename, source, &mut out);
    }

    if !errors.is_empty() {
        EXIT_PARSE_ERROR
    } else if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        EXIT_DIAGNOSTIC_ERROR
    } else {
        EXIT_SUCCESS
    }
}

fn tree(source: &str) -> String {
    let (file, _errors) = caddyfile_parse::parse(source);
    caddyfile_parse::outline(&file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_output(source: &str) -> (i32, String) {
        let mut out = Vec::new();
        let code = check("Caddyfile", source, &mut out);
        let out = strip_ansi_escapes::strip(out);
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_clean_file_succeeds() {
        let (code, out) = check_output("example.com {\n\tfile_server\n}\n");
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.is_empty(), "{out}");
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let (code, out) = check_output("example.com {\n\tbogus\n}\n");
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.contains("unknown directive \"bogus\""), "{out}");
    }

    #[test]
    fn test_parse_errors_take_precedence() {
        let (code, out) = check_output("example.com {\n\trespond {path\n");
        assert_eq!(code, EXIT_PARSE_ERROR);
        assert!(out.contains("unclosed site block"), "{out}");
    }

    #[test]
    fn test_error_diagnostics_fail() {
        let (code, _) = check_output("example.com {\n\trespond {path\n}\n");
        assert_eq!(code, EXIT_DIAGNOSTIC_ERROR);
    }

    #[test]
    fn test_tree_outline() {
        let outline = tree("example.com {\n\tfile_server\n}\n");
        assert!(outline.starts_with("site example.com [0-2]"), "{outline}");
        assert!(outline.contains("  file_server"), "{outline}");
    }

    #[test]
    fn test_args() {
        let cli = Cli::try_parse_from(["caddy-ls"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.log_level.is_none());

        let cli = Cli::try_parse_from(["caddy-ls", "check", "Caddyfile", "--log-level", "debug"])
            .unwrap();
        assert_eq!(cli.log_level, Some(LevelFilter::DEBUG));
        assert!(matches!(cli.command, Some(Command::Check { .. })));

        assert!(Cli::try_parse_from(["caddy-ls", "--log-level", "loud"]).is_err());
    }
}
