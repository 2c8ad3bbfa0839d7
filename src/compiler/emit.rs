use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::expr::{Expr, SwitchBranch};
use crate::graph::{EdgeDefinition, GraphModel, NodeBehavior, NodeDefinition};

/// How language-model nodes are treated during generation.
#[derive(Clone, Copy)]
pub(super) enum ChainSubstitution<'a> {
    /// Compile every node inline.
    None,
    /// Replace a language-model node that owns a sub-chain with a reference
    /// to that chain, tagged with the node's own id, and stop descending.
    /// `skip` exempts the root of the sub-chain currently being generated,
    /// which must compile inline rather than reference itself.
    Chains {
        chain_ids: &'a AHashMap<String, String>,
        skip: Option<&'a str>,
    },
}

/// Recursive expression generator over a [`GraphModel`].
///
/// Each recursion works on its own clone of the visited set, so sibling
/// branches never observe each other's traversal and shared descendants are
/// duplicated into every branch that reaches them. A node seen twice on the
/// same path truncates that branch to `None` rather than looping.
pub(super) struct ExprBuilder<'a> {
    model: &'a GraphModel,
    substitution: ChainSubstitution<'a>,
}

impl<'a> ExprBuilder<'a> {
    pub(super) fn new(model: &'a GraphModel) -> Self {
        Self {
            model,
            substitution: ChainSubstitution::None,
        }
    }

    pub(super) fn with_chains(
        model: &'a GraphModel,
        chain_ids: &'a AHashMap<String, String>,
        skip: Option<&'a str>,
    ) -> Self {
        Self {
            model,
            substitution: ChainSubstitution::Chains { chain_ids, skip },
        }
    }

    /// Builds the expression rooted at `node_id`. `None` means the branch
    /// truncated: the node was already on this path or does not exist.
    pub(super) fn build_from(&self, node_id: &str, visited: &AHashSet<String>) -> Option<Expr> {
        if visited.contains(node_id) {
            debug!(node_id, "already on this path; truncating branch");
            return None;
        }
        let Some(node) = self.model.node(node_id) else {
            debug!(node_id, "edge points at unknown node; truncating branch");
            return None;
        };

        let behavior = self.model.behavior(node);

        if behavior == NodeBehavior::Llm {
            if let ChainSubstitution::Chains { chain_ids, skip } = self.substitution {
                if skip != Some(node_id) {
                    if let Some(chain_id) = chain_ids.get(node_id) {
                        // The chain owns everything downstream of this node.
                        return Some(Expr::chain_ref(chain_id, node_id));
                    }
                }
            }
        }

        let mut visited = visited.clone();
        visited.insert(node_id.to_string());

        match behavior {
            NodeBehavior::Condition if self.model.out_degree(node_id) > 0 => {
                Some(self.build_condition(node, &visited))
            }
            NodeBehavior::Switch if self.model.out_degree(node_id) > 0 => {
                Some(self.build_switch(node, &visited))
            }
            _ => Some(self.build_plain(node, &visited)),
        }
    }

    fn node_ref(&self, node: &NodeDefinition) -> Expr {
        Expr::node(node.kind.as_str(), &node.id)
    }

    /// Sequential and parallel continuation for non-branching nodes.
    fn build_plain(&self, node: &NodeDefinition, visited: &AHashSet<String>) -> Expr {
        let reference = self.node_ref(node);
        let edges: Vec<&EdgeDefinition> = self.model.outgoing(&node.id).collect();

        match edges.len() {
            0 => reference,
            1 => match self.build_from(&edges[0].target, visited) {
                Some(rest) => Expr::sequence(vec![reference, rest]),
                None => reference,
            },
            _ => {
                let branches: Vec<Expr> = edges
                    .iter()
                    .filter_map(|edge| self.build_from(&edge.target, visited))
                    .collect();
                if branches.is_empty() {
                    reference
                } else {
                    Expr::sequence(vec![reference, Expr::Parallel(branches)])
                }
            }
        }
    }

    /// Two-way conditional. Edge roles come from the editor's handles
    /// (`true`/`yes` vs `false`/`no`, any case); unlabeled edges fill the
    /// remaining slots positionally.
    fn build_condition(&self, node: &NodeDefinition, visited: &AHashSet<String>) -> Expr {
        let reference = self.node_ref(node);
        let edges: Vec<&EdgeDefinition> = self.model.outgoing(&node.id).collect();

        let mut true_edge: Option<&EdgeDefinition> = None;
        let mut false_edge: Option<&EdgeDefinition> = None;
        let mut positional: Vec<&EdgeDefinition> = Vec::new();

        for edge in edges {
            match edge.source_handle.as_deref() {
                Some(h) if h.eq_ignore_ascii_case("true") || h.eq_ignore_ascii_case("yes") => {
                    if true_edge.is_none() {
                        true_edge = Some(edge);
                    }
                }
                Some(h) if h.eq_ignore_ascii_case("false") || h.eq_ignore_ascii_case("no") => {
                    if false_edge.is_none() {
                        false_edge = Some(edge);
                    }
                }
                _ => positional.push(edge),
            }
        }

        let mut positional = positional.into_iter();
        if true_edge.is_none() {
            true_edge = positional.next();
        }
        if false_edge.is_none() {
            false_edge = positional.next();
        }

        let then_branch = true_edge.and_then(|e| self.build_from(&e.target, visited));
        let else_branch = false_edge.and_then(|e| self.build_from(&e.target, visited));

        match (then_branch, else_branch) {
            (Some(then_expr), else_expr) => Expr::If {
                condition: Box::new(reference),
                then_branch: Box::new(then_expr),
                else_branch: else_expr.map(Box::new),
            },
            // True branch truncated away: the conditional cannot be
            // expressed, so degrade to the bare reference.
            (None, _) => reference,
        }
    }

    /// Multi-way route. Every arm is tagged with its target node's id so the
    /// selector component can answer `tag:<nodeId>`.
    fn build_switch(&self, node: &NodeDefinition, visited: &AHashSet<String>) -> Expr {
        let reference = self.node_ref(node);

        let branches: Vec<SwitchBranch> = self
            .model
            .outgoing(&node.id)
            .filter_map(|edge| {
                self.build_from(&edge.target, visited).map(|body| SwitchBranch {
                    body,
                    tag: edge.target.clone(),
                })
            })
            .collect();

        if branches.is_empty() {
            reference
        } else {
            Expr::Switch {
                selector: Box::new(reference),
                branches,
            }
        }
    }
}
