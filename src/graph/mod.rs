//! The workflow graph data model.
//!
//! A [`GraphDefinition`] is the canonical editor-independent description of a
//! workflow (see [`editor`] for the wire format). A [`GraphModel`] is the
//! compiled-for-traversal view of one: node lookup by id, outgoing adjacency in
//! input edge order, incoming-edge counts, and the behavior classification the
//! compiler drives on. The model is immutable once built; compilation never
//! mutates it, so one model can serve concurrent compilations.

pub mod definition;
pub mod editor;
pub mod validate;

pub use definition::{EdgeDefinition, GraphDefinition, NodeDefinition, NodeKind};
pub use editor::{EditorEdge, EditorGraph, EditorNode, IntoGraph};
pub use validate::{ValidationIssue, ValidationReport};

use ahash::AHashMap;
use tracing::debug;

/// How the compiler treats a node of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeBehavior {
    /// Entry marker. Compiled as a plain sequential step.
    Start,
    /// Ordinary sequential step.
    Plain,
    /// Two-way branch, compiled to `IF`.
    Condition,
    /// Multi-way route, compiled to `SWITCH` with target-tagged branches.
    Switch,
    /// Conversational step. The splitting boundary for sub-chains.
    Llm,
}

impl NodeBehavior {
    /// Default classification of the built-in kinds.
    pub fn of_kind(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Start => Self::Start,
            NodeKind::Llm => Self::Llm,
            NodeKind::Condition => Self::Condition,
            NodeKind::Intent | NodeKind::IntentRouter | NodeKind::Tool | NodeKind::ParamExtract => {
                Self::Switch
            }
            NodeKind::Other(_) => Self::Plain,
        }
    }
}

/// A traversal-ready view over a [`GraphDefinition`].
pub struct GraphModel {
    definition: GraphDefinition,
    node_index: AHashMap<String, usize>,
    /// Outgoing edge indices per source node, preserving input edge order.
    outgoing: AHashMap<String, Vec<usize>>,
    incoming_counts: AHashMap<String, usize>,
    /// Kind-string overrides registered through the compiler builder.
    behavior_overrides: AHashMap<String, NodeBehavior>,
}

impl GraphModel {
    pub fn new(definition: GraphDefinition) -> Self {
        Self::with_overrides(definition, AHashMap::new())
    }

    pub fn with_overrides(
        definition: GraphDefinition,
        behavior_overrides: AHashMap<String, NodeBehavior>,
    ) -> Self {
        let mut node_index = AHashMap::with_capacity(definition.nodes.len());
        for (i, node) in definition.nodes.iter().enumerate() {
            // First definition of a duplicated id wins.
            node_index.entry(node.id.clone()).or_insert(i);
        }

        let mut outgoing: AHashMap<String, Vec<usize>> = AHashMap::new();
        let mut incoming_counts: AHashMap<String, usize> = AHashMap::new();
        for (i, edge) in definition.edges.iter().enumerate() {
            outgoing.entry(edge.source.clone()).or_default().push(i);
            *incoming_counts.entry(edge.target.clone()).or_default() += 1;
        }

        Self {
            definition,
            node_index,
            outgoing,
            incoming_counts,
            behavior_overrides,
        }
    }

    pub fn definition(&self) -> &GraphDefinition {
        &self.definition
    }

    pub fn node(&self, id: &str) -> Option<&NodeDefinition> {
        self.node_index.get(id).map(|&i| &self.definition.nodes[i])
    }

    /// Outgoing edges of a node, in the order the editor stored them.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &EdgeDefinition> {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(|&i| &self.definition.edges[i])
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.outgoing.get(id).map_or(0, Vec::len)
    }

    pub fn incoming_count(&self, id: &str) -> usize {
        self.incoming_counts.get(id).copied().unwrap_or(0)
    }

    /// The behavior of a node, honoring builder overrides for its kind string.
    pub fn behavior(&self, node: &NodeDefinition) -> NodeBehavior {
        self.behavior_overrides
            .get(node.kind.as_str())
            .copied()
            .unwrap_or_else(|| NodeBehavior::of_kind(&node.kind))
    }

    /// All nodes with [`NodeBehavior::Llm`], in input order.
    pub fn llm_nodes(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.definition
            .nodes
            .iter()
            .filter(|n| self.behavior(n) == NodeBehavior::Llm)
    }

    /// Resolves the entry node: the first node marked as a start, else the
    /// first node without incoming edges, else the first node in input order.
    /// A documented fallback chain, not an error; `None` only when the graph
    /// has no nodes at all.
    pub fn resolve_start(&self) -> Option<&NodeDefinition> {
        if let Some(node) = self
            .definition
            .nodes
            .iter()
            .find(|n| self.behavior(n) == NodeBehavior::Start)
        {
            return Some(node);
        }

        if let Some(node) = self
            .definition
            .nodes
            .iter()
            .find(|n| self.incoming_count(&n.id) == 0)
        {
            debug!(node_id = %node.id, "no start node; using first root node");
            return Some(node);
        }

        let first = self.definition.nodes.first();
        if let Some(node) = first {
            debug!(node_id = %node.id, "every node has incoming edges; using first node");
        }
        first
    }

    /// Checks the graph for structural problems. The report is data: compilation
    /// proceeds regardless (dangling edges truncate, missing starts fall back).
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        if self.definition.nodes.is_empty() {
            issues.push(ValidationIssue::EmptyWorkflow);
            return ValidationReport { issues };
        }

        for edge in &self.definition.edges {
            if !self.node_index.contains_key(&edge.source) {
                issues.push(ValidationIssue::DanglingEdgeSource {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
            if !self.node_index.contains_key(&edge.target) {
                issues.push(ValidationIssue::DanglingEdgeTarget {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }

        let has_entry = self.definition.nodes.iter().any(|n| {
            self.behavior(n) == NodeBehavior::Start || self.incoming_count(&n.id) == 0
        });
        if !has_entry {
            issues.push(ValidationIssue::NoStartNode);
        }

        for node in &self.definition.nodes {
            if self.behavior(node) == NodeBehavior::Condition && self.out_degree(&node.id) == 0 {
                issues.push(ValidationIssue::ConditionWithoutBranches {
                    node_id: node.id.clone(),
                });
            }
        }

        ValidationReport { issues }
    }
}
