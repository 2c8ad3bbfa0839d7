use thiserror::Error;

/// Errors that can occur while parsing editor JSON into a [`GraphDefinition`](crate::graph::GraphDefinition).
#[derive(Error, Debug, Clone)]
pub enum GraphParseError {
    #[error("Failed to parse node JSON: {0}")]
    InvalidNodes(String),

    #[error("Failed to parse edge JSON: {0}")]
    InvalidEdges(String),
}

/// Errors that can occur during the workflow compilation phase.
///
/// Structural problems (dangling edges, missing start node, bare condition
/// nodes) are deliberately *not* errors: they degrade into truncated branches
/// and are reported through [`GraphModel::validate`](crate::graph::GraphModel::validate)
/// instead, so a half-edited workflow still compiles to something runnable.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error("Workflow '{0}' has no nodes")]
    EmptyWorkflow(String),
}

/// Errors that can occur while turning field definitions into a tool specification.
#[derive(Error, Debug, Clone)]
pub enum SpecBuildError {
    #[error("Enum field '{field}' of tool '{tool}' has no allowed values")]
    EnumWithoutValues { tool: String, field: String },

    #[error("Array field '{field}' of tool '{tool}' has no item definition")]
    ArrayWithoutItems { tool: String, field: String },

    #[error("Object field '{field}' of tool '{tool}' has no properties")]
    ObjectWithoutProperties { tool: String, field: String },

    #[error("Field tree of tool '{tool}' exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { tool: String, max_depth: usize },
}

/// Errors that can occur when driving the tool-call state machine.
#[derive(Error, Debug, Clone)]
pub enum ToolCallError {
    #[error("No tool call is pending: the state is '{status}'")]
    NoPendingCall { status: String },
}

/// Error reported by a [`ToolExecutor`](crate::slotfill::ToolExecutor) implementation.
///
/// Carried into the resulting [`ToolCallResult`](crate::slotfill::ToolCallResult)
/// as the error message; it never aborts the state machine.
#[derive(Error, Debug, Clone)]
#[error("Tool '{tool_name}' failed: {message}")]
pub struct ToolExecutionError {
    pub tool_name: String,
    pub message: String,
}

/// Errors that can occur while saving or loading a compiled workflow artifact.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Could not access artifact file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to encode artifact: {0}")]
    Encode(String),

    #[error("Failed to decode artifact: {0}")]
    Decode(String),
}
