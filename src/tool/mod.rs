//! Tool argument schemas and the model-facing specifications built from them.

pub mod field;
pub mod spec;

pub use field::{FieldDefinition, FieldKind};
pub use spec::{ParameterSpec, SchemaNode, ToolDescriptor, ToolSpec, ToolSpecBuilder};
