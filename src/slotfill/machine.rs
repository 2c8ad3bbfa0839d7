//! # Tool Call State Machine
//!
//! Drives one tool call from detection to execution, asking the user for
//! missing required parameters along the way.
//!
//! The machine owns no state of its own. Each turn the host passes in the
//! checkpointed [`ToolCallState`] plus the field definitions of the tool
//! being called, and gets back a [`ProcessOutcome`] telling it what to do
//! next: run with a result, show a follow-up question and pause, or give
//! up because the round limit was hit.

use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ToolCallError, ToolExecutionError};
use crate::slotfill::extractor::SlotExtractor;
use crate::slotfill::state::{ToolCallRequest, ToolCallResult, ToolCallState, ToolCallStatus};
use crate::tool::FieldDefinition;

/// Executes a tool once all required parameters are present.
///
/// Implementations talk to whatever actually runs tools: an HTTP endpoint,
/// a local function table, a test double. Failures are reported as values,
/// not panics, so the machine can fold them into the conversation.
pub trait ToolExecutor {
    fn execute(
        &self,
        tool_name: &str,
        tool_id: Option<Uuid>,
        params: &Map<String, Value>,
    ) -> Result<String, ToolExecutionError>;
}

/// What the state machine decided after a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// The tool ran and succeeded.
    Completed(ToolCallResult),
    /// The tool ran and failed.
    Failed(ToolCallResult),
    /// Required parameters are missing. Show `question` to the user and
    /// pause the workflow until they reply.
    NeedMoreParams {
        question: String,
        missing: Vec<String>,
    },
    /// The round limit was reached and the call was abandoned.
    Skipped { reason: String },
}

/// The slot-filling driver. See the [module docs](self) for the lifecycle.
pub struct ToolCallStateMachine<'a> {
    executor: &'a dyn ToolExecutor,
    extractor: &'a SlotExtractor<'a>,
}

impl<'a> ToolCallStateMachine<'a> {
    pub fn new(executor: &'a dyn ToolExecutor, extractor: &'a SlotExtractor<'a>) -> Self {
        Self {
            executor,
            extractor,
        }
    }

    /// Service the current tool call for the first time.
    ///
    /// Arguments the model supplied are merged over previously collected
    /// values, required parameters are checked, and the call either runs
    /// immediately or turns into a follow-up question.
    pub fn process_tool_call(
        &self,
        state: &mut ToolCallState,
        fields: &[FieldDefinition],
    ) -> Result<ProcessOutcome, ToolCallError> {
        let request = current_request(state)?;

        // Fresh arguments from the model win over earlier answers.
        for (name, value) in &request.arguments {
            state.collected_params.insert(name.clone(), value.clone());
        }

        let missing = missing_required(fields, &state.collected_params);
        info!(
            tool = %request.tool_name,
            collected = state.collected_params.len(),
            missing = ?missing,
            "checked required parameters"
        );
        state.missing_params = missing.clone();

        if missing.is_empty() {
            Ok(self.dispatch(state, &request))
        } else {
            Ok(ask(state, fields, missing))
        }
    }

    /// Service the user's answer to a follow-up question.
    ///
    /// The reply is run through the extractor for the still-missing fields
    /// only, the results are merged, and the call either runs or asks
    /// again. A state already at its round limit is skipped before any
    /// extraction happens.
    pub fn continue_collection(
        &self,
        state: &mut ToolCallState,
        fields: &[FieldDefinition],
        user_reply: &str,
    ) -> Result<ProcessOutcome, ToolCallError> {
        let request = current_request(state)?;

        if state.current_round >= state.max_rounds {
            state.status = ToolCallStatus::Skipped;
            let reason = format!(
                "parameter collection exceeded {} rounds, skipping '{}'",
                state.max_rounds, request.tool_name
            );
            info!(tool = %request.tool_name, "{}", reason);
            return Ok(ProcessOutcome::Skipped { reason });
        }

        state.status = ToolCallStatus::ExtractingParams;
        let extracted = self
            .extractor
            .extract(user_reply, fields, &state.missing_params);
        debug!(extracted = extracted.len(), "merged extracted parameters");
        for (name, value) in extracted {
            state.collected_params.insert(name, value);
        }

        let missing = missing_required(fields, &state.collected_params);
        state.missing_params = missing.clone();

        if missing.is_empty() {
            Ok(self.dispatch(state, &request))
        } else {
            Ok(ask(state, fields, missing))
        }
    }

    /// Run the tool with the collected parameters and record the result.
    fn dispatch(&self, state: &mut ToolCallState, request: &ToolCallRequest) -> ProcessOutcome {
        state.status = ToolCallStatus::ExecutingTool;
        info!(tool = %request.tool_name, params = state.collected_params.len(), "executing tool");

        let started = Instant::now();
        let outcome = self
            .executor
            .execute(&request.tool_name, request.tool_id, &state.collected_params);
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                let result = ToolCallResult {
                    tool_call_id: request.id.clone(),
                    tool_name: request.tool_name.clone(),
                    success: true,
                    result: Some(output),
                    error_message: None,
                    duration_ms,
                };
                state.status = ToolCallStatus::ToolCompleted;
                state.push_result(result.clone());
                ProcessOutcome::Completed(result)
            }
            Err(error) => {
                warn!(tool = %request.tool_name, %error, "tool execution failed");
                let result = ToolCallResult {
                    tool_call_id: request.id.clone(),
                    tool_name: request.tool_name.clone(),
                    success: false,
                    result: None,
                    error_message: Some(error.message),
                    duration_ms,
                };
                state.status = ToolCallStatus::ToolFailed;
                state.push_result(result.clone());
                ProcessOutcome::Failed(result)
            }
        }
    }
}

fn current_request(state: &ToolCallState) -> Result<ToolCallRequest, ToolCallError> {
    state
        .current_tool_call
        .clone()
        .ok_or_else(|| ToolCallError::NoPendingCall {
            status: state.status.to_string(),
        })
}

/// Record the follow-up question on the state and pause.
fn ask(
    state: &mut ToolCallState,
    fields: &[FieldDefinition],
    missing: Vec<String>,
) -> ProcessOutcome {
    let question = build_followup_question(fields, &missing);
    debug!(round = state.current_round + 1, %question, "asking for missing parameters");
    state.next_question = Some(question.clone());
    state.status = ToolCallStatus::WaitingUserInput;
    state.current_round += 1;
    ProcessOutcome::NeedMoreParams { question, missing }
}

/// A required value counts as missing when it is absent, JSON `null`, an
/// empty string, or one of the literal strings `"null"` / `"Null"` that
/// models like to emit for unknowns.
fn is_missing(params: &Map<String, Value>, name: &str) -> bool {
    match params.get(name) {
        None => true,
        Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty() || s == "null" || s == "Null",
        Some(_) => false,
    }
}

/// Names of required fields that are still missing, in definition order.
fn missing_required(fields: &[FieldDefinition], params: &Map<String, Value>) -> Vec<String> {
    fields
        .iter()
        .filter(|field| field.required && is_missing(params, &field.name))
        .map(|field| field.name.clone())
        .collect()
}

/// Build one question covering every missing parameter.
///
/// A field's configured follow-up question is preferred; otherwise the
/// display label plus description stands in. A single configured question
/// that already reads like one is returned verbatim, everything else is
/// wrapped into a "please provide" sentence or a numbered list.
fn build_followup_question(fields: &[FieldDefinition], missing: &[String]) -> String {
    if missing.is_empty() {
        return "Please provide more information to continue.".to_string();
    }

    let mut parts: Vec<String> = Vec::with_capacity(missing.len());
    for name in missing {
        match fields.iter().find(|field| &field.name == name) {
            Some(field) => {
                if let Some(question) = field.followup_question.as_deref() {
                    if !question.is_empty() {
                        parts.push(question.to_string());
                        continue;
                    }
                }
                let label = field.display_label();
                match field.description.as_deref() {
                    Some(desc) if !desc.is_empty() => parts.push(format!("{} ({})", label, desc)),
                    _ => parts.push(label.to_string()),
                }
            }
            // No definition for this name, the bare parameter name has to do.
            None => parts.push(name.clone()),
        }
    }

    if parts.len() == 1 {
        let part = &parts[0];
        if part.contains('?') || part.contains('？') || part.to_lowercase().starts_with("please") {
            part.clone()
        } else {
            format!("Please provide {}.", part)
        }
    } else {
        let mut combined = String::from("Please provide the following information:\n");
        for (index, part) in parts.iter().enumerate() {
            combined.push_str(&format!("{}. {}", index + 1, part));
            if index < parts.len() - 1 {
                combined.push('\n');
            }
        }
        combined
    }
}
