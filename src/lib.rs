//! # Rensa - Workflow Graph Compilation and Slot Filling
//!
//! **Rensa** compiles node-and-edge workflow graphs, as drawn in a visual
//! editor, into rule-engine chain expressions, and drives the multi-turn
//! parameter collection that tool-calling conversations need. Graphs are
//! compiled ahead of time into plain strings and serializable artifacts, so
//! the runtime that executes them never has to see the editor format.
//!
//! ## Core Workflow
//!
//! The engine is format-tolerant at the edges and strict in the middle. The
//! primary workflow is:
//!
//! 1.  **Load Your Graph**: Parse the editor's node and edge JSON with
//!     [`GraphDefinition::from_editor_json`](graph::GraphDefinition::from_editor_json),
//!     or implement [`IntoGraph`](graph::IntoGraph) for your own format.
//! 2.  **Validate**: [`WorkflowCompiler::validate`](compiler::WorkflowCompiler::validate)
//!     reports structural problems as data instead of refusing to compile, so
//!     half-edited workflows still produce something runnable.
//! 3.  **Compile**: [`WorkflowCompiler::compile`](compiler::WorkflowCompiler::compile)
//!     walks the graph from its start node and renders one chain expression.
//! 4.  **Split**: [`WorkflowCompiler::split`](compiler::WorkflowCompiler::split)
//!     additionally extracts a sub-chain per LLM node, so a conversation that
//!     pauses inside the workflow can resume exactly where it stopped.
//! 5.  **Fill Slots**: at runtime, drive tool calls with the
//!     [`slotfill`] state machine until every required parameter is collected.
//!
//! ## Quick Start
//!
//! ```rust
//! use rensa::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Graphs arrive as two JSON arrays from the visual editor.
//!     let nodes = r#"[
//!         {"id": "n1", "type": "start", "data": {"label": "Start"}},
//!         {"id": "n2", "type": "llm", "data": {"label": "Answer"}},
//!         {"id": "n3", "type": "reply", "data": {"label": "Send"}}
//!     ]"#;
//!     let edges = r#"[
//!         {"source": "n1", "target": "n2"},
//!         {"source": "n2", "target": "n3"}
//!     ]"#;
//!
//!     let graph = GraphDefinition::from_editor_json(nodes, edges)?;
//!     let compiler = WorkflowCompiler::builder("wf_demo", graph).build();
//!
//!     // The whole workflow as one inline chain expression.
//!     let expression = compiler.compile()?;
//!     assert_eq!(
//!         expression,
//!         r#"node("start").tag("n1"), node("llm").tag("n2"), node("reply").tag("n3")"#
//!     );
//!
//!     // Split form: the LLM node's continuation lives in its own sub-chain
//!     // and the main chain refers to it by id.
//!     let compiled = compiler.split()?;
//!     assert_eq!(
//!         compiled.main_expression,
//!         r#"node("start").tag("n1"), subchain_wf_demo_n2.tag("n2")"#
//!     );
//!
//!     let chain = compiled.sub_chain_for("n2").ok_or("missing sub-chain")?;
//!     assert_eq!(chain.chain_id, "subchain_wf_demo_n2");
//!     assert_eq!(
//!         chain.expression,
//!         r#"THEN(node("llm").tag("n2"), node("reply").tag("n3"))"#
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! For the runtime side, the [`slotfill`] module documentation walks a tool
//! call through detection, follow-up questions and execution.

pub mod compiler;
pub mod error;
pub mod expr;
pub mod graph;
pub mod prelude;
pub mod slotfill;
pub mod tool;
