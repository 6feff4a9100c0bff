//! `tagtrace scan`: one traceability run over the project.

use std::sync::Arc;
use std::time::Duration;

use tagtrace_config::ReportConfig;
use tagtrace_diagnostics::TerminalRenderer;
use tagtrace_engine::{EngineError, RunOptions, TraceEngine};
use tagtrace_parser::{RipgrepSearcher, Searcher};
use tagtrace_report::{render_summary, RunStatus, TraceReport};
use tokio_util::sync::CancellationToken;

use crate::pipeline::load_project;
use crate::{GlobalArgs, ReportFormat, ScanArgs};

/// Runs the `tagtrace scan` command.
///
/// Exits with the report's status code. Input errors propagate and map to
/// the input-error code in `main`; a cancelled or timed-out run counts as a
/// failed analysis.
pub fn run(args: &ScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut project = load_project(global)?;
    merge_report_policy(&mut project.config.report, args);

    let options = run_options(args, &project.dir);
    let searcher: Arc<dyn Searcher> =
        Arc::new(RipgrepSearcher::new(project.config.search.binary.clone()));
    let engine = TraceEngine::new(project.config, searcher)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let cancel = CancellationToken::new();
    let result = runtime.block_on(async {
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling scan");
                interrupt.cancel();
            }
        });
        engine.run(&options, &cancel).await
    });

    let report = match result {
        Ok(report) => report,
        Err(e @ (EngineError::Cancelled | EngineError::DeadlineExceeded(_))) => {
            eprintln!("error: {e}");
            return Ok(RunStatus::Failed.exit_code());
        }
        Err(EngineError::Internal(e)) => {
            eprintln!("error: {e}");
            return Ok(RunStatus::Failed.exit_code());
        }
        Err(e) => return Err(e.into()),
    };

    emit(&report, args, global)?;
    Ok(report.status.exit_code())
}

fn run_options(args: &ScanArgs, project_dir: &std::path::Path) -> RunOptions {
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| project_dir.to_path_buf());
    let mut options = RunOptions::new(root).with_force(args.force);
    if !args.scopes.is_empty() {
        options = options.with_scopes(args.scopes.iter().cloned());
    }
    if let Some(secs) = args.ttl_secs {
        options = options.with_ttl(Duration::from_secs(secs));
    }
    if let Some(secs) = args.deadline_secs {
        options = options.with_deadline(Duration::from_secs(secs));
    }
    options
}

fn emit(
    report: &TraceReport,
    args: &ScanArgs,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(ref path) = args.output {
        report.write_json(path)?;
    }
    match args.format {
        ReportFormat::Json => println!("{}", report.to_json_pretty()?),
        ReportFormat::Text => {
            if !global.quiet {
                let renderer = TerminalRenderer::new(global.color);
                print!("{}", render_summary(report, &renderer));
            }
        }
    }
    Ok(())
}

/// Merges CLI `--deny`/`--allow` over the configured finding policy.
///
/// A kind named on the command line is removed from the opposite list.
fn merge_report_policy(config: &mut ReportConfig, args: &ScanArgs) {
    for kind in &args.deny {
        config.allow.retain(|k| k != kind);
        if !config.deny.contains(kind) {
            config.deny.push(kind.clone());
        }
    }
    for kind in &args.allow {
        config.deny.retain(|k| k != kind);
        if !config.allow.contains(kind) {
            config.allow.push(kind.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    fn scan_args(argv: &[&str]) -> ScanArgs {
        let mut full = vec!["tagtrace", "scan"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            crate::Command::Scan(args) => args,
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn cli_deny_removes_config_allow() {
        let mut config = ReportConfig {
            allow: vec!["orphaned-tag".to_string()],
            ..ReportConfig::default()
        };
        merge_report_policy(&mut config, &scan_args(&["--deny", "orphaned-tag"]));
        assert_eq!(config.deny, vec!["orphaned-tag"]);
        assert!(config.allow.is_empty());
    }

    #[test]
    fn cli_allow_removes_config_deny() {
        let mut config = ReportConfig {
            deny: vec!["W201".to_string(), "E102".to_string()],
            ..ReportConfig::default()
        };
        merge_report_policy(&mut config, &scan_args(&["--allow", "W201"]));
        assert_eq!(config.deny, vec!["E102"]);
        assert_eq!(config.allow, vec!["W201"]);
    }

    #[test]
    fn merge_does_not_duplicate() {
        let mut config = ReportConfig {
            deny: vec!["low-coverage".to_string()],
            ..ReportConfig::default()
        };
        merge_report_policy(&mut config, &scan_args(&["--deny", "low-coverage"]));
        assert_eq!(config.deny, vec!["low-coverage"]);
    }

    #[test]
    fn options_default_to_project_dir() {
        let options = run_options(&scan_args(&[]), Path::new("/work/app"));
        assert_eq!(options, RunOptions::new("/work/app"));
    }

    #[test]
    fn options_carry_overrides() {
        let args = scan_args(&[
            "--root",
            "/elsewhere",
            "--scope",
            "src",
            "--ttl-secs",
            "9",
            "--deadline-secs",
            "4",
            "--force",
        ]);
        let options = run_options(&args, Path::new("/work/app"));
        assert_eq!(options.root, PathBuf::from("/elsewhere"));
        assert_eq!(options.scopes, Some(vec![PathBuf::from("src")]));
        assert_eq!(options.ttl, Some(Duration::from_secs(9)));
        assert_eq!(options.deadline, Some(Duration::from_secs(4)));
        assert!(options.force);
    }
}
