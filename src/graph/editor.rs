//! Conversion from the visual editor's wire format into a [`GraphDefinition`].
//!
//! The editor persists nodes and edges as two JSON arrays. Both carry plenty of
//! presentation-only fields (positions, sizes, selection state); everything not
//! listed here is ignored during deserialization.

use serde::Deserialize;

use super::definition::{EdgeDefinition, GraphDefinition, NodeDefinition, NodeKind};
use crate::error::GraphParseError;

/// A trait for custom graph formats that can be converted into a [`GraphDefinition`].
///
/// The built-in editor format below is one implementation; callers with their
/// own storage shape implement this on their top-level struct and hand the
/// result to [`WorkflowCompiler`](crate::compiler::WorkflowCompiler).
pub trait IntoGraph {
    /// Consumes the object and converts it into a compilable workflow graph.
    fn into_graph(self) -> Result<GraphDefinition, GraphParseError>;
}

/// One node as the editor stores it: `{ "id": ..., "type": ..., "data": { "label": ... } }`.
#[derive(Debug, Deserialize)]
pub struct EditorNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: EditorNodeData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditorNodeData {
    #[serde(default)]
    pub label: String,
}

/// One edge as the editor stores it.
#[derive(Debug, Deserialize)]
pub struct EditorEdge {
    pub source: String,
    pub target: String,
    #[serde(default, rename = "sourceHandle")]
    pub source_handle: Option<String>,
}

/// The two-array editor payload.
#[derive(Debug)]
pub struct EditorGraph {
    pub nodes: Vec<EditorNode>,
    pub edges: Vec<EditorEdge>,
}

impl IntoGraph for EditorGraph {
    fn into_graph(self) -> Result<GraphDefinition, GraphParseError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw| NodeDefinition {
                id: raw.id,
                kind: NodeKind::from_type(&raw.node_type),
                label: raw.data.label,
            })
            .collect();

        let edges = self
            .edges
            .into_iter()
            .map(|raw| EdgeDefinition {
                source: raw.source,
                target: raw.target,
                source_handle: raw.source_handle,
            })
            .collect();

        Ok(GraphDefinition { nodes, edges })
    }
}

impl GraphDefinition {
    /// Parses the editor's node and edge JSON arrays into a graph definition.
    ///
    /// ```
    /// use rensa::prelude::*;
    ///
    /// let graph = GraphDefinition::from_editor_json(
    ///     r#"[{"id": "n1", "type": "start", "data": {"label": "Start"}}]"#,
    ///     r#"[]"#,
    /// ).unwrap();
    /// assert_eq!(graph.nodes[0].kind, NodeKind::Start);
    /// ```
    pub fn from_editor_json(nodes_json: &str, edges_json: &str) -> Result<Self, GraphParseError> {
        let nodes: Vec<EditorNode> = serde_json::from_str(nodes_json)
            .map_err(|e| GraphParseError::InvalidNodes(e.to_string()))?;
        let edges: Vec<EditorEdge> = serde_json::from_str(edges_json)
            .map_err(|e| GraphParseError::InvalidEdges(e.to_string()))?;

        EditorGraph { nodes, edges }.into_graph()
    }
}
