//! Common test utilities for building workflow graph definitions.
use rensa::graph::{EdgeDefinition, NodeDefinition};
use rensa::prelude::*;

#[allow(dead_code)]
pub fn node(id: &str, kind: &str) -> NodeDefinition {
    NodeDefinition::new(id, NodeKind::from_type(kind))
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> EdgeDefinition {
    EdgeDefinition::new(source, target)
}

#[allow(dead_code)]
pub fn edge_with_handle(source: &str, target: &str, handle: &str) -> EdgeDefinition {
    EdgeDefinition::new(source, target).with_handle(handle)
}

/// Creates the smallest interesting workflow.
///
/// Shape: `start -> llm -> reply`
#[allow(dead_code)]
pub fn create_linear_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![node("n1", "start"), node("n2", "llm"), node("n3", "reply")],
        edges: vec![edge("n1", "n2"), edge("n2", "n3")],
    }
}

/// Creates a diamond-shaped workflow with a parallel fan-out.
///
/// Shape: `start -> hub -> {left, right} -> join`
#[allow(dead_code)]
pub fn create_diamond_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node("start", "start"),
            node("hub", "broadcast"),
            node("left", "reply"),
            node("right", "api_call"),
            node("join", "reply"),
        ],
        edges: vec![
            edge("start", "hub"),
            edge("hub", "left"),
            edge("hub", "right"),
            edge("left", "join"),
            edge("right", "join"),
        ],
    }
}

/// Creates a workflow with a two-way conditional.
///
/// Shape: `start -> cond -(true)-> yes` and `cond -(false)-> no`
#[allow(dead_code)]
pub fn create_condition_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node("s", "start"),
            node("c", "condition"),
            node("yes", "reply"),
            node("no", "reply"),
        ],
        edges: vec![
            edge("s", "c"),
            edge_with_handle("c", "yes", "true"),
            edge_with_handle("c", "no", "false"),
        ],
    }
}

/// Creates a workflow with a three-way intent route.
///
/// Shape: `start -> intent -> {a, b, c}`
#[allow(dead_code)]
pub fn create_intent_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node("s", "start"),
            node("i", "intent"),
            node("a", "reply"),
            node("b", "handoff"),
            node("c", "knowledge"),
        ],
        edges: vec![
            edge("s", "i"),
            edge_with_handle("i", "a", "intent_0"),
            edge_with_handle("i", "b", "intent_1"),
            edge("i", "c"),
        ],
    }
}

/// Creates a workflow with two language-model nodes in a row.
///
/// Shape: `start -> llm1 -> mid -> llm2 -> end`
#[allow(dead_code)]
pub fn create_llm_chain_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node("s", "start"),
            node("llm1", "llm"),
            node("mid", "reply"),
            node("llm2", "llm"),
            node("end", "handoff"),
        ],
        edges: vec![
            edge("s", "llm1"),
            edge("llm1", "mid"),
            edge("mid", "llm2"),
            edge("llm2", "end"),
        ],
    }
}

/// Scratch directory for tests that write artifacts to disk.
#[allow(dead_code)]
pub fn setup_test_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("rensa_tests");
    std::fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}
