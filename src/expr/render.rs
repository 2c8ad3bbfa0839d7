//! Rendering of [`Expr`] trees into the engine's expression text.
//!
//! The output is a canonical single-line form: sequences join with `", "`,
//! branch bodies are wrapped according to their structure, and branch lists
//! are deduplicated by rendered text preserving first occurrence. Rendering
//! the same tree always yields the same text.

use itertools::Itertools;

use super::tree::{Expr, SwitchBranch};

/// Renders an expression to the engine's text form.
pub fn render(expr: &Expr) -> String {
    match expr {
        Expr::Node { kind, id } => format!("node(\"{kind}\").tag(\"{id}\")"),
        Expr::ChainRef { chain_id, tag } => format!("{chain_id}.tag(\"{tag}\")"),
        Expr::Sequence(items) => items.iter().map(render).join(", "),
        Expr::Parallel(branches) => {
            let members = branches
                .iter()
                .map(render_parallel_member)
                .unique()
                .join(", ");
            format!("WHEN({members})")
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let mut parts = vec![
                render(condition),
                format!("THEN({})", render(then_branch)),
            ];
            if let Some(else_expr) = else_branch {
                parts.push(format!("THEN({})", render(else_expr)));
            }
            format!("IF({})", parts.join(", "))
        }
        Expr::Switch { selector, branches } => {
            let arms = branches
                .iter()
                .map(render_switch_branch)
                .unique()
                .join(", ");
            format!("SWITCH({}).TO({arms})", render(selector))
        }
    }
}

/// Renders a whole chain body: multi-step bodies are wrapped in `THEN(...)`
/// so the result is a single invokable group. Bodies that already render as a
/// group (`WHEN`/`IF`/`SWITCH`) are left bare.
pub fn render_chain(expr: &Expr) -> String {
    if expr.is_group() {
        render(expr)
    } else {
        format!("THEN({})", render(expr))
    }
}

/// A `WHEN` member: a sequence must become one group to stay a single branch.
fn render_parallel_member(branch: &Expr) -> String {
    match branch {
        Expr::Sequence(_) => format!("THEN({})", render(branch)),
        _ => render(branch),
    }
}

/// A `SWITCH` arm carries `.tag("<target id>")` so the engine can match the
/// selector's `tag:<nodeId>` answer. A lone node or chain reference already
/// ends in exactly that tag; composite bodies get it appended.
fn render_switch_branch(branch: &SwitchBranch) -> String {
    match &branch.body {
        Expr::Node { .. } | Expr::ChainRef { .. } => render(&branch.body),
        Expr::Sequence(_) => {
            format!("THEN({}).tag(\"{}\")", render(&branch.body), branch.tag)
        }
        _ => format!("{}.tag(\"{}\")", render(&branch.body), branch.tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_reference_form() {
        let expr = Expr::node("llm", "n1");
        assert_eq!(render(&expr), "node(\"llm\").tag(\"n1\")");
    }

    #[test]
    fn sequence_joins_with_separator() {
        let expr = Expr::sequence(vec![Expr::node("start", "a"), Expr::node("reply", "b")]);
        assert_eq!(
            render(&expr),
            "node(\"start\").tag(\"a\"), node(\"reply\").tag(\"b\")"
        );
    }

    #[test]
    fn parallel_members_wrap_sequences_and_dedup() {
        let branch = Expr::sequence(vec![Expr::node("api", "b"), Expr::node("reply", "d")]);
        let expr = Expr::Parallel(vec![branch.clone(), branch]);
        assert_eq!(
            render(&expr),
            "WHEN(THEN(node(\"api\").tag(\"b\"), node(\"reply\").tag(\"d\")))"
        );
    }

    #[test]
    fn if_without_else_omits_second_then() {
        let expr = Expr::If {
            condition: Box::new(Expr::node("condition", "c")),
            then_branch: Box::new(Expr::node("reply", "t")),
            else_branch: None,
        };
        assert_eq!(
            render(&expr),
            "IF(node(\"condition\").tag(\"c\"), THEN(node(\"reply\").tag(\"t\")))"
        );
    }

    #[test]
    fn switch_arm_keeps_bare_reference_tag() {
        let expr = Expr::Switch {
            selector: Box::new(Expr::node("intent", "s")),
            branches: vec![SwitchBranch {
                body: Expr::node("reply", "t1"),
                tag: "t1".to_string(),
            }],
        };
        assert_eq!(
            render(&expr),
            "SWITCH(node(\"intent\").tag(\"s\")).TO(node(\"reply\").tag(\"t1\"))"
        );
    }

    #[test]
    fn switch_arm_tags_composite_bodies() {
        let body = Expr::sequence(vec![Expr::node("api", "t1"), Expr::node("reply", "r")]);
        let expr = Expr::Switch {
            selector: Box::new(Expr::node("intent", "s")),
            branches: vec![SwitchBranch {
                body,
                tag: "t1".to_string(),
            }],
        };
        assert_eq!(
            render(&expr),
            "SWITCH(node(\"intent\").tag(\"s\")).TO(THEN(node(\"api\").tag(\"t1\"), node(\"reply\").tag(\"r\")).tag(\"t1\"))"
        );
    }

    #[test]
    fn chain_render_wraps_sequences_only() {
        let seq = Expr::sequence(vec![Expr::node("llm", "a"), Expr::node("reply", "b")]);
        assert_eq!(
            render_chain(&seq),
            "THEN(node(\"llm\").tag(\"a\"), node(\"reply\").tag(\"b\"))"
        );

        let single = Expr::node("llm", "a");
        assert_eq!(render_chain(&single), "THEN(node(\"llm\").tag(\"a\"))");

        let switch = Expr::Switch {
            selector: Box::new(Expr::node("intent", "s")),
            branches: vec![SwitchBranch {
                body: Expr::node("reply", "t"),
                tag: "t".to_string(),
            }],
        };
        assert!(render_chain(&switch).starts_with("SWITCH("));
    }
}
