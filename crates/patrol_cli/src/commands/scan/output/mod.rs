//! Output formatting for scan results.

mod json;
mod text;
mod tree;

use crate::OutputFormat;
use crate::scanning::ScanRun;

/// Writes scan output to stdout in the requested format.
pub fn write_output(format: OutputFormat, run: &ScanRun) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    match format {
        OutputFormat::Text => text::write(run, &mut stdout),
        OutputFormat::Json => json::write(run, &mut stdout),
        OutputFormat::Tree => tree::write(run, &mut stdout),
    }
}
