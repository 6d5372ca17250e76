//! Report command - scans and writes a markdown report.

use anyhow::Context as _;
use console::style;
use patrol_core::FsReader;
use patrol_core::report::write_report;

use crate::ReportArgs;
use crate::scanning::{run_scan, workspace_root};
use crate::ui::{colors, format_duration, indicators, print_command_header, pluralise_word};

/// Executes the `patrol report` command.
pub fn run(args: &ReportArgs) -> super::Result {
    print_command_header("report");

    let Some(run) = run_scan(&args.selection, true)? else {
        return Ok(());
    };

    let snapshot = run.snapshot();
    let today = chrono::Local::now().date_naive();

    let root = workspace_root(&args.selection, args.root.as_deref());

    let path = write_report(&root, &snapshot.findings, &FsReader, today)
        .context("error generating security report")?;

    let count = snapshot.findings.len();
    println!(
        "{} {} {}",
        colors::success().apply_to(indicators::ADDED),
        style(path.display()).bold(),
        colors::muted().apply_to(format!(
            "({count} {}, {})",
            pluralise_word(count, "finding", "findings"),
            format_duration(run.elapsed)
        ))
    );
    println!();

    Ok(())
}
