//! Lookup command - shows the finding at a file and line.

use anyhow::Context as _;
use patrol_core::hover::{highlight, hover_text};

use crate::scanning::run_scan;
use crate::ui::{colors, print_info};
use crate::{LookupArgs, SelectionArgs};

/// Scans `args.file` and prints the hover text for `args.line`.
pub fn run(args: &LookupArgs) -> super::Result {
    let selection = SelectionArgs {
        paths: vec![args.file.clone()],
        config: args.config.clone(),
        include: None,
        exclude: Vec::new(),
        skip_gitignore: true,
    };

    let Some(run) = run_scan(&selection, false)? else {
        return Ok(());
    };

    let file = std::path::absolute(&args.file)
        .with_context(|| format!("failed to resolve {}", args.file.display()))?;

    let Some(text) = hover_text(&run.store, &file, args.line) else {
        print_info(&format!("No finding at {}:{}", args.file.display(), args.line));
        return Ok(());
    };

    println!("{text}");

    if let Some(finding) = run.store.by_location(&file, args.line) {
        let range = highlight(&finding);
        println!(
            "{}",
            colors::muted().apply_to(format!(
                "{} · line {} · columns {}..{}",
                finding.name,
                range.line + 1,
                range.start,
                range.end
            ))
        );
    }

    Ok(())
}
