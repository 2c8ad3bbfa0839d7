//! Workflow compilation: a node/edge graph in, engine expression text out.
//!
//! [`WorkflowCompiler`] drives the whole pipeline. [`compile`](WorkflowCompiler::compile)
//! renders the full graph as one expression; [`split`](WorkflowCompiler::split)
//! additionally carves the graph at language-model boundaries into resumable
//! sub-chains (see [`SubChain`]). Custom editor kind strings are mapped onto
//! the built-in behaviors through [`CompilerBuilder`].

mod artifact;
mod emit;
mod splitter;

pub use artifact::CompiledWorkflow;
pub use splitter::SubChain;

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::error::CompileError;
use crate::expr::render;
use crate::graph::{GraphDefinition, GraphModel, NodeBehavior, ValidationReport};
use emit::ExprBuilder;
use splitter::SubChainSplitter;

/// Compiles one workflow definition into the engine's expression syntax.
///
/// The compiler holds no mutable state: both [`compile`](Self::compile) and
/// [`split`](Self::split) are pure functions of the graph, deterministic for a
/// given edge order, and safe to call concurrently for different workflows.
///
/// ```
/// use rensa::prelude::*;
///
/// let definition = GraphDefinition {
///     nodes: vec![
///         NodeDefinition::new("s", NodeKind::Start),
///         NodeDefinition::new("r", NodeKind::from_type("reply")),
///     ],
///     edges: vec![EdgeDefinition::new("s", "r")],
/// };
///
/// let compiler = WorkflowCompiler::builder("wf", definition).build();
/// let expression = compiler.compile().unwrap();
/// assert_eq!(expression, "node(\"start\").tag(\"s\"), node(\"reply\").tag(\"r\")");
/// ```
pub struct WorkflowCompiler {
    workflow_id: String,
    model: GraphModel,
}

/// Configures a [`WorkflowCompiler`], mapping extra editor kind strings onto
/// the built-in node behaviors.
pub struct CompilerBuilder {
    workflow_id: String,
    definition: GraphDefinition,
    overrides: AHashMap<String, NodeBehavior>,
}

impl CompilerBuilder {
    pub fn new(workflow_id: impl Into<String>, definition: GraphDefinition) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            definition,
            overrides: AHashMap::new(),
        }
    }

    /// Treats nodes of the given kind string as language-model nodes.
    pub fn with_llm_kind(self, kind: &str) -> Self {
        self.with_behavior(kind, NodeBehavior::Llm)
    }

    /// Treats nodes of the given kind string as multi-way routes.
    pub fn with_switch_kind(self, kind: &str) -> Self {
        self.with_behavior(kind, NodeBehavior::Switch)
    }

    /// Treats nodes of the given kind string as two-way conditionals.
    pub fn with_condition_kind(self, kind: &str) -> Self {
        self.with_behavior(kind, NodeBehavior::Condition)
    }

    /// Treats nodes of the given kind string as start markers.
    pub fn with_start_kind(self, kind: &str) -> Self {
        self.with_behavior(kind, NodeBehavior::Start)
    }

    /// Registers an arbitrary behavior for a kind string.
    pub fn with_behavior(mut self, kind: &str, behavior: NodeBehavior) -> Self {
        self.overrides.insert(kind.to_string(), behavior);
        self
    }

    pub fn build(self) -> WorkflowCompiler {
        WorkflowCompiler {
            workflow_id: self.workflow_id,
            model: GraphModel::with_overrides(self.definition, self.overrides),
        }
    }
}

impl WorkflowCompiler {
    pub fn builder(workflow_id: impl Into<String>, definition: GraphDefinition) -> CompilerBuilder {
        CompilerBuilder::new(workflow_id, definition)
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    /// Checks the graph for structural problems without compiling it.
    pub fn validate(&self) -> ValidationReport {
        self.model.validate()
    }

    /// Compiles the whole graph into a single expression, starting from the
    /// resolved entry node. Language-model nodes are inlined like any other.
    pub fn compile(&self) -> Result<String, CompileError> {
        let start = self
            .model
            .resolve_start()
            .ok_or_else(|| CompileError::EmptyWorkflow(self.workflow_id.clone()))?;
        debug!(
            workflow_id = %self.workflow_id,
            start_node = %start.id,
            "compiling workflow expression"
        );

        let builder = ExprBuilder::new(&self.model);
        let expression = builder
            .build_from(&start.id, &AHashSet::new())
            .map(|expr| render(&expr))
            .unwrap_or_default();
        Ok(expression)
    }

    /// The recursive primitive behind [`compile`](Self::compile): renders the
    /// expression rooted at one node. `None` means the branch truncated
    /// (node unknown, or already in `visited`).
    pub fn compile_from(&self, node_id: &str, visited: AHashSet<String>) -> Option<String> {
        ExprBuilder::new(&self.model)
            .build_from(node_id, &visited)
            .map(|expr| render(&expr))
    }

    /// Splits the workflow at language-model boundaries: one resumable
    /// sub-chain per language-model node with successors, plus a main
    /// expression referencing those chains.
    pub fn split(&self) -> Result<CompiledWorkflow, CompileError> {
        SubChainSplitter::new(&self.model, &self.workflow_id).split()
    }
}
