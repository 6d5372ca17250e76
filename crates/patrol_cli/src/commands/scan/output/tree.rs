//! Grouped tree output for scan findings.

use std::io::Write;

use patrol_core::tree::{TreeNode, children, roots};

use crate::scanning::ScanRun;
use crate::ui::colors;

/// Prints one branch per pattern name with a leaf per finding.
pub fn write(run: &ScanRun, writer: &mut dyn Write) -> anyhow::Result<()> {
    let groups = roots(&run.store);

    if groups.is_empty() {
        writeln!(writer, "{}", colors::muted().apply_to("No security patterns found."))?;
        return Ok(());
    }

    for group in &groups {
        let TreeNode::Group(node) = group else { continue };
        writeln!(writer, "{}", colors::accent().bold().apply_to(&node.label))?;

        let leaves = children(group);
        let last = leaves.len().saturating_sub(1);
        for (idx, leaf) in leaves.iter().enumerate() {
            let TreeNode::Finding(item) = leaf else { continue };
            let branch = if idx == last { "└─" } else { "├─" };
            writeln!(
                writer,
                "  {} {}  {}",
                colors::muted().apply_to(branch),
                item.label,
                colors::muted().apply_to(&item.description),
            )?;
        }
    }

    Ok(())
}
