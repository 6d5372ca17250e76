//! Display-ready tree nodes for findings views.
//!
//! The tree has two levels: one group node per pattern name, each holding one
//! leaf per finding. Nodes carry plain strings so any front end (terminal,
//! editor sidebar, JSON consumer) can render them without further lookups.

use serde::Serialize;

use crate::finding::Finding;
use crate::store::{FindingGroup, FindingStore, group_by_name};

/// Command identifier attached to every finding leaf.
pub const OPEN_FINDING_COMMAND: &str = "patrol.openFinding";

/// Node in the findings tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TreeNode {
    /// All findings for one pattern name.
    Group(GroupNode),
    /// A single finding.
    Finding(FindingNode),
}

/// Top-level node for one pattern name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    /// `"<name> (<count>)"`.
    pub label: String,
    /// `"<count> finding(s) for pattern: <name>"`.
    pub tooltip: String,
    /// Whether the node can be expanded.
    pub collapsible: bool,
    /// Pattern name shared by every child.
    pub name: String,
    #[serde(skip)]
    findings: Vec<Finding>,
}

/// Leaf node for one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingNode {
    /// File basename.
    pub label: String,
    /// `"Line N"`.
    pub description: String,
    /// Matched text, a blank line, then the pattern description.
    pub tooltip: String,
    /// Action to run when the node is activated.
    pub command: OpenCommand,
}

/// Request to open a finding's file at its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCommand {
    /// Always [`OPEN_FINDING_COMMAND`].
    pub command: &'static str,
    /// Human-readable title for menus.
    pub title: &'static str,
    /// The finding to open.
    pub finding: Finding,
}

impl GroupNode {
    fn from_group(group: FindingGroup) -> Self {
        let count = group.len();
        Self {
            label: format!("{} ({count})", group.name),
            tooltip: format!("{count} finding(s) for pattern: {}", group.name),
            collapsible: count > 0,
            name: group.name,
            findings: group.findings,
        }
    }

    /// Returns the findings under this node in scan order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

impl FindingNode {
    fn from_finding(finding: &Finding) -> Self {
        Self {
            label: finding.file_name(),
            description: format!("Line {}", finding.line),
            tooltip: format!(
                "{}\n\n{}",
                finding.matched,
                finding.description.as_deref().unwrap_or_default()
            ),
            command: OpenCommand {
                command: OPEN_FINDING_COMMAND,
                title: "Open File",
                finding: finding.clone(),
            },
        }
    }
}

/// Returns one group node per pattern name, in first-seen order.
#[must_use]
pub fn roots(store: &FindingStore) -> Vec<TreeNode> {
    group_nodes(&store.snapshot().findings)
}

/// Builds group nodes from an explicit finding list.
#[must_use]
pub fn group_nodes(findings: &[Finding]) -> Vec<TreeNode> {
    group_by_name(findings)
        .into_iter()
        .map(|group| TreeNode::Group(GroupNode::from_group(group)))
        .collect()
}

/// Returns the children of `node`. Leaves have none.
#[must_use]
pub fn children(node: &TreeNode) -> Vec<TreeNode> {
    match node {
        TreeNode::Group(group) => group
            .findings
            .iter()
            .map(|f| TreeNode::Finding(FindingNode::from_finding(f)))
            .collect(),
        TreeNode::Finding(_) => Vec::new(),
    }
}
