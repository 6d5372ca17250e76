//! JSON output formatter for scan findings.

use std::io::Write;

use patrol_core::prelude::*;
use serde::Serialize;

use crate::scanning::ScanRun;

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: &'a [Finding],
    skipped: Vec<JsonSkipped>,
    scanned: usize,
    files: usize,
}

#[derive(Serialize)]
struct JsonSkipped {
    path: String,
    reason: String,
}

/// Serialises findings and skip counts as pretty-printed JSON.
pub fn write(run: &ScanRun, writer: &mut dyn Write) -> anyhow::Result<()> {
    let snapshot = run.snapshot();

    let report = JsonReport {
        findings: &snapshot.findings,
        skipped: snapshot
            .skipped
            .iter()
            .map(|s| JsonSkipped {
                path: s.path.display().to_string(),
                reason: s.reason.to_string(),
            })
            .collect(),
        scanned: snapshot.scanned,
        files: run.file_count,
    };

    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}
