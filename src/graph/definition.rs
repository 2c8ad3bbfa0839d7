use serde::{Deserialize, Serialize};

/// The complete, canonical definition of a workflow graph, ready for compilation.
/// This is the target structure for any editor-format conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub nodes: Vec<NodeDefinition>,
    pub edges: Vec<EdgeDefinition>,
}

/// Defines a single node in the workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    pub kind: NodeKind,
    /// Display label from the editor. Never influences compilation.
    #[serde(default)]
    pub label: String,
}

impl NodeDefinition {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: String::new(),
        }
    }
}

/// Defines a directed connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub source: String,
    pub target: String,
    /// Editor output handle, e.g. `"true"`/`"false"` on condition nodes.
    #[serde(default)]
    pub source_handle: Option<String>,
}

impl EdgeDefinition {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }
}

/// The closed set of node kinds the compiler understands.
///
/// The editor's type string is preserved: known strings map onto a named
/// variant, anything else is carried as [`NodeKind::Other`] and compiled as a
/// plain sequential step. Rendered references always use the original string,
/// so the execution engine sees exactly what the editor stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Start,
    Llm,
    Condition,
    Intent,
    IntentRouter,
    Tool,
    ParamExtract,
    Other(String),
}

impl NodeKind {
    /// Classifies an editor type string.
    pub fn from_type(type_name: &str) -> Self {
        match type_name {
            "start" => Self::Start,
            "llm" => Self::Llm,
            "condition" => Self::Condition,
            "intent" => Self::Intent,
            "intent_router" => Self::IntentRouter,
            "tool" => Self::Tool,
            "parameter_extraction" => Self::ParamExtract,
            other => Self::Other(other.to_string()),
        }
    }

    /// The editor type string, as used inside rendered `node("...")` references.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Llm => "llm",
            Self::Condition => "condition",
            Self::Intent => "intent",
            Self::IntentRouter => "intent_router",
            Self::Tool => "tool",
            Self::ParamExtract => "parameter_extraction",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        Self::from_type(&value)
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
