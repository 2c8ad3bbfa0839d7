//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! rensa crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! // Use the prelude to get easy access to all the core types.
//! use rensa::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load the editor export and compile it
//! let nodes_json = std::fs::read_to_string("path/to/nodes.json")?;
//! let edges_json = std::fs::read_to_string("path/to/edges.json")?;
//!
//! let graph = GraphDefinition::from_editor_json(&nodes_json, &edges_json)?;
//! let compiler = WorkflowCompiler::builder("wf_support", graph).build();
//!
//! // Report structural problems without refusing to compile
//! for message in compiler.validate().messages() {
//!     eprintln!("warning: {}", message);
//! }
//!
//! // Split into a main chain plus one sub-chain per LLM node and persist
//! let compiled = compiler.split()?;
//! compiled.save("path/to/workflow.bin")?;
//!
//! println!("Main chain: {}", compiled.main_expression);
//! # Ok(())
//! # }
//! ```

// Core compilation
pub use crate::compiler::{CompiledWorkflow, SubChain, WorkflowCompiler};

// Graph model and editor interop
pub use crate::graph::{
    EdgeDefinition, GraphDefinition, GraphModel, IntoGraph, NodeBehavior, NodeDefinition,
    NodeKind, ValidationReport,
};

// Expression tree and rendering
pub use crate::expr::{Expr, render, render_chain};

// Tool specifications
pub use crate::tool::{FieldDefinition, FieldKind, ToolDescriptor, ToolSpec, ToolSpecBuilder};

// Slot filling
pub use crate::slotfill::{
    ChatModel, ProcessOutcome, SlotExtractor, ToolCallRequest, ToolCallResult, ToolCallState,
    ToolCallStateMachine, ToolExecutor,
};

// Error types
pub use crate::error::{ArtifactError, CompileError, GraphParseError, SpecBuildError};

// Serde JSON types that appear throughout the tool-call API
pub use serde_json::{Map, Value};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
