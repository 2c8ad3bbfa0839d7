//! Expression tree and text rendering for the engine's rule syntax.

pub mod render;
pub mod tree;

pub use render::{render, render_chain};
pub use tree::{Expr, SwitchBranch};
