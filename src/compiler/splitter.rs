use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::artifact::CompiledWorkflow;
use super::emit::ExprBuilder;
use crate::error::CompileError;
use crate::expr::{render, render_chain};
use crate::graph::{GraphModel, NodeBehavior};

/// One independently deployable chain carved out around a language-model node.
///
/// The chain body contains the node itself and everything downstream of it up
/// to (but not including) the next language-model node. Its id is
/// deterministic, `subchain_<workflowId>_<llmNodeId>`, so a paused session can
/// be resumed by invoking exactly this chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubChain {
    pub chain_id: String,
    pub llm_node_id: String,
    /// Rendered chain body, wrapped so it is invokable on its own.
    pub expression: String,
    /// Every node belonging to this chain, in discovery order.
    pub member_node_ids: Vec<String>,
}

/// Partitions a workflow at language-model boundaries.
///
/// Every language-model node with at least one successor gets a [`SubChain`];
/// one without successors is left inline as an ordinary leaf. The main
/// expression is then generated over the full graph with each chain-owning
/// node replaced by a reference to its chain, so the main expression stays a
/// short routing table while post-model branching lives in the chains.
pub(super) struct SubChainSplitter<'a> {
    model: &'a GraphModel,
    workflow_id: &'a str,
}

impl<'a> SubChainSplitter<'a> {
    pub(super) fn new(model: &'a GraphModel, workflow_id: &'a str) -> Self {
        Self { model, workflow_id }
    }

    pub(super) fn split(&self) -> Result<CompiledWorkflow, CompileError> {
        let start = self
            .model
            .resolve_start()
            .ok_or_else(|| CompileError::EmptyWorkflow(self.workflow_id.to_string()))?;

        let llm_node_ids: Vec<String> = self.model.llm_nodes().map(|n| n.id.clone()).collect();
        debug!(
            workflow_id = self.workflow_id,
            count = llm_node_ids.len(),
            "identified language-model nodes"
        );

        let mut chain_ids: AHashMap<String, String> = AHashMap::new();
        for llm_id in &llm_node_ids {
            if self.model.out_degree(llm_id) > 0 {
                chain_ids.insert(
                    llm_id.clone(),
                    format!("subchain_{}_{}", self.workflow_id, llm_id),
                );
            } else {
                debug!(node_id = %llm_id, "language-model node has no successors; staying inline");
            }
        }

        let mut sub_chains = Vec::new();
        for llm_id in &llm_node_ids {
            let Some(chain_id) = chain_ids.get(llm_id) else {
                continue;
            };
            let builder = ExprBuilder::with_chains(self.model, &chain_ids, Some(llm_id));
            let Some(expr) = builder.build_from(llm_id, &AHashSet::new()) else {
                warn!(node_id = %llm_id, "sub-chain body came out empty; skipping chain");
                continue;
            };

            let sub_chain = SubChain {
                chain_id: chain_id.clone(),
                llm_node_id: llm_id.clone(),
                expression: render_chain(&expr),
                member_node_ids: self.collect_members(llm_id),
            };
            debug!(
                chain_id = %sub_chain.chain_id,
                members = sub_chain.member_node_ids.len(),
                "generated sub-chain"
            );
            sub_chains.push(sub_chain);
        }

        let builder = ExprBuilder::with_chains(self.model, &chain_ids, None);
        let main_expression = builder
            .build_from(&start.id, &AHashSet::new())
            .map(|expr| render(&expr))
            .unwrap_or_default();

        Ok(CompiledWorkflow {
            workflow_id: self.workflow_id.to_string(),
            main_expression,
            sub_chains,
            llm_node_ids,
        })
    }

    /// Downstream closure of a chain root in depth-first discovery order.
    /// Traversal does not continue into other language-model nodes; those
    /// belong to their own chains.
    fn collect_members(&self, root_id: &str) -> Vec<String> {
        let mut ordered = Vec::new();
        let mut seen = AHashSet::new();
        self.collect_into(root_id, root_id, &mut ordered, &mut seen);
        ordered
    }

    fn collect_into(
        &self,
        node_id: &str,
        root_id: &str,
        ordered: &mut Vec<String>,
        seen: &mut AHashSet<String>,
    ) {
        if self.model.node(node_id).is_none() {
            return;
        }
        if !seen.insert(node_id.to_string()) {
            return;
        }
        ordered.push(node_id.to_string());

        for edge in self.model.outgoing(node_id) {
            if self.is_foreign_llm(&edge.target, root_id) {
                continue;
            }
            self.collect_into(&edge.target, root_id, ordered, seen);
        }
    }

    fn is_foreign_llm(&self, node_id: &str, root_id: &str) -> bool {
        node_id != root_id
            && self
                .model
                .node(node_id)
                .is_some_and(|n| self.model.behavior(n) == NodeBehavior::Llm)
    }
}
