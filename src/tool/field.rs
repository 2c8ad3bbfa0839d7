use serde::{Deserialize, Serialize};

/// One field of a tool's argument schema, as configured in the tool editor.
///
/// The wire format is camelCase JSON; unknown editor fields are ignored. The
/// same definitions drive three things: the model-facing spec
/// ([`ToolSpecBuilder`](super::ToolSpecBuilder)), the missing-parameter check,
/// and the follow-up questions asked while collecting values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// JSON key of the argument.
    pub name: String,
    /// Human-facing name, used when asking the user for the value.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Helps the model understand the field; shown in the emitted spec.
    #[serde(default)]
    pub description: Option<String>,
    /// Allowed values when `kind` is [`FieldKind::Enum`].
    #[serde(default)]
    pub enum_values: Vec<String>,
    /// Element definition when `kind` is [`FieldKind::Array`].
    #[serde(default)]
    pub items: Option<Box<FieldDefinition>>,
    /// Nested fields when `kind` is [`FieldKind::Object`].
    #[serde(default)]
    pub properties: Vec<FieldDefinition>,
    /// Literal question to ask when the value is missing; synthesized from
    /// the display name and description if absent.
    #[serde(default)]
    pub followup_question: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            kind,
            required: false,
            description: None,
            enum_values: Vec::new(),
            items: None,
            properties: Vec::new(),
            followup_question: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_followup_question(mut self, question: impl Into<String>) -> Self {
        self.followup_question = Some(question.into());
        self
    }

    pub fn with_enum_values(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_items(mut self, items: FieldDefinition) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn with_properties(mut self, properties: Vec<FieldDefinition>) -> Self {
        self.properties = properties;
        self
    }

    /// The name to show users when referring to this field.
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// The description handed to the model, falling back to the display name.
    pub fn model_description(&self) -> &str {
        self.description
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or(&self.name)
    }
}

/// The closed set of field kinds the schema language supports.
///
/// The date, time and contact kinds are string-shaped on the wire; they exist
/// so definitions can state the expected format to the model and to future
/// validators. Matching over this enum is always exhaustive, so adding a kind
/// forces every consumer to decide how to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    /// Calendar date, `yyyy-MM-dd`.
    Date,
    /// Date and time, `yyyy-MM-dd HH:mm:ss`.
    #[serde(rename = "DATETIME")]
    DateTime,
    Email,
    Phone,
    Enum,
    Array,
    Object,
}
