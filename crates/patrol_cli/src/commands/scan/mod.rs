//! Scan command - scans files against the configured patterns.

mod output;

use anyhow::Context as _;
use patrol_core::FsReader;
use patrol_core::report::write_report;

use self::output::write_output;
use crate::scanning::{ScanRun, run_scan, workspace_root};
use crate::ui::{exit, print_command_header, print_success};
use crate::{OutputFormat, ScanArgs};

/// Executes the `patrol scan` command.
pub fn run(args: &ScanArgs) -> super::Result {
    let show_progress = should_show_progress(args);

    if show_progress {
        print_command_header("scan");
    }

    let Some(run) = run_scan(&args.selection, show_progress)? else {
        return Ok(());
    };

    write_output(args.format, &run)?;

    if args.report {
        write_report_file(args, &run)?;
    }

    handle_exit_code(args, &run);

    Ok(())
}

const fn should_show_progress(args: &ScanArgs) -> bool {
    matches!(args.format, OutputFormat::Text)
}

fn write_report_file(args: &ScanArgs, run: &ScanRun) -> super::Result {
    let today = chrono::Local::now().date_naive();
    let snapshot = run.snapshot();
    let root = workspace_root(&args.selection, args.root.as_deref());

    let path = write_report(&root, &snapshot.findings, &FsReader, today)
        .context("error generating security report")?;

    if should_show_progress(args) {
        print_success(&format!("Security report written to {}", path.display()));
    }
    Ok(())
}

fn handle_exit_code(args: &ScanArgs, run: &ScanRun) {
    if args.exit_zero {
        return;
    }

    if !run.snapshot().findings.is_empty() {
        std::process::exit(exit::FINDINGS);
    }
}
