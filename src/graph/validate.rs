use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single structural problem found in a workflow graph.
///
/// Issues are advisory: the compiler still produces output for any of them
/// except an empty workflow. They exist so the editor can surface problems
/// before a workflow is published.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssue {
    #[error("Workflow has no nodes")]
    EmptyWorkflow,

    #[error("Edge '{source}' -> '{target}' references a source node that does not exist")]
    DanglingEdgeSource { r#source: String, target: String },

    #[error("Edge '{source}' -> '{target}' references a target node that does not exist")]
    DanglingEdgeTarget { r#source: String, target: String },

    #[error("Workflow has no start node and no node without incoming edges")]
    NoStartNode,

    #[error("Condition node '{node_id}' has no outgoing branches")]
    ConditionWithoutBranches { node_id: String },
}

/// The outcome of validating a graph. Always returned, never an `Err`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue messages in input order, ready for display.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }
}
