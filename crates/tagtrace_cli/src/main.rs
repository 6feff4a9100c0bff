//! tagtrace CLI: traceability checks over annotation tags in a source tree.
//!
//! Provides `tagtrace scan` for a full traceability run, `tagtrace init` to
//! write a default `tagtrace.toml`, `tagtrace cache clear` to drop cached
//! scan state, and `tagtrace taxonomy` to print the resolved tag categories.

#![warn(missing_docs)]

mod cache;
mod init;
mod pipeline;
mod scan;
mod taxonomy;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Exit code for configuration, scope, and other input errors.
pub const EXIT_INPUT_ERROR: i32 = 3;

/// tagtrace: requirement-to-test traceability from annotation tags.
#[derive(Parser, Debug)]
#[command(name = "tagtrace", version, about = "Annotation tag traceability checker")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `tagtrace.toml`, or to the project directory containing it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default `tagtrace.toml` into the current directory.
    Init {
        /// Overwrite an existing `tagtrace.toml`.
        #[arg(long)]
        force: bool,
    },
    /// Scan the project and report traceability.
    Scan(ScanArgs),
    /// Manage the scan cache.
    Cache {
        /// The cache operation.
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// Print the tag categories of each tier.
    Taxonomy,
}

/// Cache operations.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CacheCommand {
    /// Remove every cache entry and the last-scan snapshot.
    Clear,
    /// Remove cache entries older than the TTL.
    Prune {
        /// Entry lifetime in seconds; defaults to `[cache] ttl_secs`.
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

/// Arguments for the `tagtrace scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Project root. Defaults to the directory holding `tagtrace.toml`.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directories to scan instead of `[scan] scopes`.
    #[arg(long = "scope", num_args = 1..)]
    pub scopes: Vec<PathBuf>,

    /// Cache entry lifetime in seconds instead of `[cache] ttl_secs`.
    #[arg(long)]
    pub ttl_secs: Option<u64>,

    /// Ignore cached results and rescan everything.
    #[arg(long)]
    pub force: bool,

    /// Cancel the run if it takes longer than this many seconds.
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Finding kinds to suppress (e.g., `--allow orphaned-tag`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Finding kinds to promote to errors (e.g., `--deny incomplete-chain`).
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Also write the JSON report to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to log at debug level.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or project directory.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stdout().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    pipeline::init_logging(&global);

    let result = match cli.command {
        Command::Init { force } => init::run(force),
        Command::Scan(ref args) => scan::run(args, &global),
        Command::Cache { ref command } => cache::run(command, &global),
        Command::Taxonomy => taxonomy::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(EXIT_INPUT_ERROR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_scan_default() {
        let cli = Cli::parse_from(["tagtrace", "scan"]);
        match cli.command {
            Command::Scan(ref args) => {
                assert!(args.root.is_none());
                assert!(args.scopes.is_empty());
                assert!(!args.force);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn parse_scan_with_args() {
        let cli = Cli::parse_from([
            "tagtrace",
            "scan",
            "--root",
            "/work/app",
            "--scope",
            "src",
            "docs",
            "--ttl-secs",
            "60",
            "--force",
            "--deadline-secs",
            "10",
            "--deny",
            "orphaned-tag",
            "--allow",
            "low-coverage",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Scan(ref args) => {
                assert_eq!(args.root, Some(PathBuf::from("/work/app")));
                assert_eq!(args.scopes, vec![PathBuf::from("src"), PathBuf::from("docs")]);
                assert_eq!(args.ttl_secs, Some(60));
                assert!(args.force);
                assert_eq!(args.deadline_secs, Some(10));
                assert_eq!(args.deny, vec!["orphaned-tag"]);
                assert_eq!(args.allow, vec!["low-coverage"]);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn parse_cache_clear() {
        let cli = Cli::parse_from(["tagtrace", "cache", "clear"]);
        match cli.command {
            Command::Cache { command } => assert_eq!(command, CacheCommand::Clear),
            _ => panic!("expected Cache command"),
        }
    }

    #[test]
    fn parse_cache_prune() {
        let cli = Cli::parse_from(["tagtrace", "cache", "prune", "--ttl-secs", "5"]);
        match cli.command {
            Command::Cache { command } => {
                assert_eq!(command, CacheCommand::Prune { ttl_secs: Some(5) })
            }
            _ => panic!("expected Cache command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["tagtrace", "--quiet", "--color", "never", "taxonomy"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["tagtrace", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }
}
