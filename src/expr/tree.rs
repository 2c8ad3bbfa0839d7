/// The abstract syntax tree for the engine's expression language.
///
/// Generation builds this tree; [`render`](super::render::render) turns it into
/// the engine's text form. Keeping the two apart means branch wrapping and tag
/// placement are decided on structure, never by sniffing rendered strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A reference to one workflow node: `node("kind").tag("id")`.
    Node { kind: String, id: String },

    /// A call into a separately compiled chain: `chain_id.tag("tag")`.
    ChainRef { chain_id: String, tag: String },

    /// Steps executed one after another.
    Sequence(Vec<Expr>),

    /// Branches executed concurrently: `WHEN(...)`.
    Parallel(Vec<Expr>),

    /// Two-way conditional: `IF(cond, THEN(a), THEN(b))`.
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },

    /// Multi-way route: `SWITCH(selector).TO(b1, b2, ...)`.
    Switch {
        selector: Box<Expr>,
        branches: Vec<SwitchBranch>,
    },
}

/// One arm of a [`Expr::Switch`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwitchBranch {
    pub body: Expr,
    /// The engine dispatches on this tag. Always the branch target's node id,
    /// so the selector component can answer with `tag:<nodeId>`.
    pub tag: String,
}

impl Expr {
    pub fn node(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Node {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn chain_ref(chain_id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::ChainRef {
            chain_id: chain_id.into(),
            tag: tag.into(),
        }
    }

    /// Builds a sequence, splicing nested sequences and collapsing singletons.
    pub fn sequence(items: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Expr::Sequence(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.into_iter().next().unwrap_or(Expr::Sequence(Vec::new()))
        } else {
            Expr::Sequence(flat)
        }
    }

    /// Whether this expression renders as a self-delimiting group
    /// (`WHEN`/`IF`/`SWITCH`) rather than a bare reference list.
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            Expr::Parallel(_) | Expr::If { .. } | Expr::Switch { .. }
        )
    }
}
