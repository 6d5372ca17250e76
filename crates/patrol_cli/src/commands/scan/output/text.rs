//! Text output formatting for scan results.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use console::style;
use patrol_core::prelude::*;
use patrol_core::text::context_lines;

use crate::scanning::ScanRun;
use crate::ui::{colors, format_duration, indicators, pluralise_word};

const LINE_NUMBER_WIDTH: usize = 4;

type SourceCache = HashMap<PathBuf, Option<String>>;

/// Renders findings as styled, human-readable text followed by a summary.
pub fn write(run: &ScanRun, writer: &mut dyn Write) -> anyhow::Result<()> {
    let snapshot = run.snapshot();
    let mut sources = SourceCache::new();

    for finding in &snapshot.findings {
        write_finding(finding, &mut sources, writer)?;
    }

    write_summary(run, &snapshot, writer)
}

fn write_finding(finding: &Finding, sources: &mut SourceCache, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(
        writer,
        "{} {} {} {}",
        colors::error().apply_to(indicators::ERROR),
        style(&finding.name).bold(),
        colors::muted().apply_to("·"),
        colors::secondary().apply_to(finding.description_or_default()),
    )?;
    writeln!(
        writer,
        "  {}",
        colors::accent().apply_to(format!("{}:{}", finding.file.display(), finding.line))
    )?;

    if let Some(content) = source(sources, &finding.file) {
        for line in context_lines(content, finding.line as usize) {
            let marker = if line.is_finding { ">" } else { " " };
            let text = line.text.trim_end_matches('\r');
            let code = if line.is_finding {
                style(text).bold().to_string()
            } else {
                colors::code().apply_to(text).to_string()
            };
            writeln!(
                writer,
                "  {} {} {} {}",
                colors::error().apply_to(marker),
                colors::line_number().apply_to(format!("{:>LINE_NUMBER_WIDTH$}", line.number)),
                colors::muted().apply_to("│"),
                code,
            )?;
        }
    }

    writeln!(writer)?;
    Ok(())
}

fn source<'a>(sources: &'a mut SourceCache, path: &Path) -> Option<&'a str> {
    sources
        .entry(path.to_path_buf())
        .or_insert_with(|| FsReader.read_text(path).ok())
        .as_deref()
}

fn write_summary(run: &ScanRun, snapshot: &ScanResult, writer: &mut dyn Write) -> anyhow::Result<()> {
    let count = snapshot.findings.len();
    let skipped = snapshot.skipped_count();
    let timing = colors::muted().apply_to(format!(
        "{} {} in {}",
        run.file_count,
        pluralise_word(run.file_count, "file", "files"),
        format_duration(run.elapsed)
    ));

    if count == 0 {
        writeln!(
            writer,
            "{} No security patterns found. {skipped} {} skipped. {timing}",
            colors::success().apply_to(indicators::SUCCESS),
            pluralise_word(skipped, "file was", "files were"),
        )?;
    } else {
        writeln!(
            writer,
            "{} Found {count} security pattern {}. {skipped} {} skipped. {timing}",
            colors::error().apply_to(indicators::ERROR),
            pluralise_word(count, "match", "matches"),
            pluralise_word(skipped, "file was", "files were"),
        )?;
    }

    Ok(())
}
