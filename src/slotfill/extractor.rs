//! # Slot Extractor
//!
//! Pulls parameter values out of free-form user replies with the help of a
//! chat model. The model is asked to answer with a bare JSON object; the
//! parsing is deliberately forgiving because models wrap their answers in
//! code fences and prose no matter how firmly the prompt forbids it.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::tool::FieldDefinition;

/// Minimal chat-completion seam the extractor talks through.
///
/// The error type is a plain string: the extractor never propagates model
/// failures, it degrades to an empty extraction and lets the state machine
/// ask the user again.
pub trait ChatModel {
    fn complete(&self, prompt: &str) -> Result<String, String>;
}

/// Extracts values for named fields from user text via a [`ChatModel`].
pub struct SlotExtractor<'a> {
    model: &'a dyn ChatModel,
}

impl<'a> SlotExtractor<'a> {
    pub fn new(model: &'a dyn ChatModel) -> Self {
        Self { model }
    }

    /// Extract values for `target_names` from `text`.
    ///
    /// Only fields named in `target_names` appear in the prompt and only
    /// their non-null answers make it into the returned map, so the model
    /// cannot inject parameters nobody asked for. Any model or parse
    /// failure yields an empty map.
    pub fn extract(
        &self,
        text: &str,
        fields: &[FieldDefinition],
        target_names: &[String],
    ) -> Map<String, Value> {
        if target_names.is_empty() {
            return Map::new();
        }

        let prompt = build_extraction_prompt(text, fields, target_names);
        let response = match self.model.complete(&prompt) {
            Ok(response) => response,
            Err(message) => {
                warn!(%message, "parameter extraction failed");
                return Map::new();
            }
        };

        let json = extract_json(&response);
        let parsed: Map<String, Value> = match serde_json::from_str(json) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("extraction response was not a JSON object");
                return Map::new();
            }
            Err(error) => {
                warn!(%error, "could not parse extraction response");
                return Map::new();
            }
        };

        let mut extracted = Map::new();
        for (name, value) in parsed {
            if target_names.contains(&name) && !value.is_null() {
                extracted.insert(name, value);
            }
        }
        debug!(extracted = extracted.len(), targets = target_names.len(), "extraction finished");
        extracted
    }
}

fn build_extraction_prompt(
    text: &str,
    fields: &[FieldDefinition],
    target_names: &[String],
) -> String {
    let mut prompt =
        String::from("Extract information from the text below and return it as JSON.\n\n");
    prompt.push_str("Text: ");
    prompt.push_str(text);
    prompt.push_str("\n\nFields to extract:\n");

    for field in fields {
        if target_names.contains(&field.name) {
            prompt.push_str("- ");
            prompt.push_str(&field.name);
            prompt.push_str(": ");
            prompt.push_str(field.model_description());
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "\nReturn only the JSON object, no other text. Use null for any field the text does not mention.",
    );
    prompt
}

/// Extract JSON from a response that may contain markdown code fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            return &trimmed[start..=end];
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::FieldKind;

    struct CannedModel(&'static str);

    impl ChatModel for CannedModel {
        fn complete(&self, _prompt: &str) -> Result<String, String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingModel;

    impl ChatModel for FailingModel {
        fn complete(&self, _prompt: &str) -> Result<String, String> {
            Err("model unavailable".to_string())
        }
    }

    fn city_field() -> FieldDefinition {
        FieldDefinition::new("city", FieldKind::String)
            .required()
            .with_description("destination city")
    }

    #[test]
    fn extract_json_plain_object() {
        assert_eq!(extract_json(r#"{"city": "Oslo"}"#), r#"{"city": "Oslo"}"#);
    }

    #[test]
    fn extract_json_code_fence() {
        let input = "Here you go:\n```json\n{\"city\": \"Oslo\"}\n```";
        assert_eq!(extract_json(input), "{\"city\": \"Oslo\"}");
    }

    #[test]
    fn extract_json_surrounding_prose() {
        let input = r#"The answer is {"city": "Oslo"} as requested."#;
        assert_eq!(extract_json(input), r#"{"city": "Oslo"}"#);
    }

    #[test]
    fn keeps_only_targeted_non_null_values() {
        let model = CannedModel(r#"{"city": "Oslo", "date": null, "sneaky": "extra"}"#);
        let extractor = SlotExtractor::new(&model);
        let fields = vec![city_field()];

        let extracted = extractor.extract(
            "I'm in Oslo",
            &fields,
            &["city".to_string(), "date".to_string()],
        );

        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted["city"], "Oslo");
    }

    #[test]
    fn model_failure_degrades_to_empty_map() {
        let model = FailingModel;
        let extractor = SlotExtractor::new(&model);
        let fields = vec![city_field()];

        let extracted = extractor.extract("I'm in Oslo", &fields, &["city".to_string()]);
        assert!(extracted.is_empty());
    }

    #[test]
    fn unparseable_response_degrades_to_empty_map() {
        let model = CannedModel("I could not find any of the requested fields.");
        let extractor = SlotExtractor::new(&model);
        let fields = vec![city_field()];

        let extracted = extractor.extract("hello", &fields, &["city".to_string()]);
        assert!(extracted.is_empty());
    }

    #[test]
    fn prompt_lists_only_targeted_fields() {
        let fields = vec![
            city_field(),
            FieldDefinition::new("date", FieldKind::Date).with_display_name("Travel date"),
        ];
        let prompt = build_extraction_prompt("tomorrow", &fields, &["date".to_string()]);

        assert!(prompt.contains("- date: Travel date"));
        assert!(!prompt.contains("- city"));
        assert!(prompt.contains("Text: tomorrow"));
    }
}
