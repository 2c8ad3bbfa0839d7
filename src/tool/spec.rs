use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::warn;

use super::field::{FieldDefinition, FieldKind};
use crate::error::SpecBuildError;

/// Nesting depth at which a field tree is rejected as malformed.
const MAX_FIELD_DEPTH: usize = 16;

/// Caller-side description of one tool: identity plus its argument fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// A model-callable tool specification built from field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

/// One parameter of a [`ToolSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    /// Always prefixed `[optional]`; see [`ToolSpecBuilder::build`].
    pub description: String,
    pub schema: SchemaNode,
}

/// The JSON-schema shape of a parameter. A closed union: every consumer
/// matches exhaustively, so a new kind cannot be silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaNode {
    String,
    Integer,
    Number,
    Boolean,
    Enumeration(Vec<String>),
    Array(Box<SchemaNode>),
    Object(Vec<ParameterSpec>),
}

impl SchemaNode {
    /// The JSON-schema fragment for this node, without a description.
    fn schema_json(&self) -> Value {
        match self {
            Self::String => json!({"type": "string"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Enumeration(values) => json!({"type": "string", "enum": values}),
            Self::Array(items) => json!({"type": "array", "items": items.schema_json()}),
            Self::Object(properties) => {
                let mut props = Map::new();
                for parameter in properties {
                    props.insert(parameter.name.clone(), parameter.schema_json());
                }
                json!({"type": "object", "properties": props})
            }
        }
    }
}

impl ParameterSpec {
    fn schema_json(&self) -> Value {
        let mut value = self.schema.schema_json();
        if let Value::Object(map) = &mut value {
            map.insert(
                "description".to_string(),
                Value::String(self.description.clone()),
            );
        }
        value
    }
}

impl ToolSpec {
    /// The model-facing tool definition: name, description and a JSON-schema
    /// `input_schema` over all parameters. The `required` list is always
    /// empty; true requiredness is enforced afterwards by the state machine.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for parameter in &self.parameters {
            properties.insert(parameter.name.clone(), parameter.schema_json());
        }
        json!({
            "name": self.name,
            "description": self.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": []
            }
        })
    }
}

/// Converts field definitions into model-callable [`ToolSpec`]s.
pub struct ToolSpecBuilder;

impl ToolSpecBuilder {
    /// Builds the spec for one tool.
    ///
    /// Every parameter description is prefixed `[optional]` regardless of the
    /// field's `required` flag: the model must never be blocked from
    /// attempting the call, and the state machine re-collects whatever
    /// required values the call arrived without.
    pub fn build(descriptor: &ToolDescriptor) -> Result<ToolSpec, SpecBuildError> {
        let mut parameters = Vec::with_capacity(descriptor.fields.len());
        for field in &descriptor.fields {
            parameters.push(Self::build_parameter(&descriptor.name, field, 0)?);
        }
        Ok(ToolSpec {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            parameters,
        })
    }

    /// Builds specs for many tools. A tool whose field tree fails to build is
    /// logged and skipped so unrelated tools still get their specs.
    pub fn build_many(descriptors: &[ToolDescriptor]) -> Vec<ToolSpec> {
        let mut specs = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            match Self::build(descriptor) {
                Ok(spec) => specs.push(spec),
                Err(e) => {
                    warn!(tool = %descriptor.name, error = %e, "skipping tool with invalid field schema");
                }
            }
        }
        specs
    }

    fn build_parameter(
        tool: &str,
        field: &FieldDefinition,
        depth: usize,
    ) -> Result<ParameterSpec, SpecBuildError> {
        Ok(ParameterSpec {
            name: field.name.clone(),
            description: format!("[optional] {}", field.model_description()),
            schema: Self::build_schema(tool, field, depth)?,
        })
    }

    fn build_schema(
        tool: &str,
        field: &FieldDefinition,
        depth: usize,
    ) -> Result<SchemaNode, SpecBuildError> {
        if depth > MAX_FIELD_DEPTH {
            return Err(SpecBuildError::TooDeep {
                tool: tool.to_string(),
                max_depth: MAX_FIELD_DEPTH,
            });
        }

        match field.kind {
            FieldKind::String
            | FieldKind::Date
            | FieldKind::DateTime
            | FieldKind::Email
            | FieldKind::Phone => Ok(SchemaNode::String),
            FieldKind::Integer => Ok(SchemaNode::Integer),
            FieldKind::Number => Ok(SchemaNode::Number),
            FieldKind::Boolean => Ok(SchemaNode::Boolean),
            FieldKind::Enum => {
                if field.enum_values.is_empty() {
                    Err(SpecBuildError::EnumWithoutValues {
                        tool: tool.to_string(),
                        field: field.name.clone(),
                    })
                } else {
                    Ok(SchemaNode::Enumeration(field.enum_values.clone()))
                }
            }
            FieldKind::Array => match &field.items {
                Some(items) => Ok(SchemaNode::Array(Box::new(Self::build_schema(
                    tool,
                    items,
                    depth + 1,
                )?))),
                None => Err(SpecBuildError::ArrayWithoutItems {
                    tool: tool.to_string(),
                    field: field.name.clone(),
                }),
            },
            FieldKind::Object => {
                if field.properties.is_empty() {
                    return Err(SpecBuildError::ObjectWithoutProperties {
                        tool: tool.to_string(),
                        field: field.name.clone(),
                    });
                }
                let properties = field
                    .properties
                    .iter()
                    .map(|nested| Self::build_parameter(tool, nested, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SchemaNode::Object(properties))
            }
        }
    }
}
