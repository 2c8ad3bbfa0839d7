//! Tests for the tool-call state machine and parameter collection.
use std::cell::{Cell, RefCell};

use rensa::error::{ToolCallError, ToolExecutionError};
use rensa::slotfill::{
    ChatModel, ProcessOutcome, SlotExtractor, ToolCallRequest, ToolCallState,
    ToolCallStateMachine, ToolCallStatus, ToolExecutor,
};
use rensa::tool::{FieldDefinition, FieldKind};
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Executor double that records every parameter map it is called with.
struct RecordingExecutor {
    calls: RefCell<Vec<Map<String, Value>>>,
    fail_with: Option<String>,
}

impl RecordingExecutor {
    fn succeeding() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }
}

impl ToolExecutor for RecordingExecutor {
    fn execute(
        &self,
        tool_name: &str,
        _tool_id: Option<Uuid>,
        params: &Map<String, Value>,
    ) -> Result<String, ToolExecutionError> {
        self.calls.borrow_mut().push(params.clone());
        match &self.fail_with {
            Some(message) => Err(ToolExecutionError {
                tool_name: tool_name.to_string(),
                message: message.clone(),
            }),
            None => Ok(format!("ok:{}", tool_name)),
        }
    }
}

/// Chat-model double that replays scripted responses and counts calls.
struct ScriptedModel {
    responses: RefCell<Vec<String>>,
    calls: Cell<usize>,
}

impl ScriptedModel {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: RefCell::new(responses.iter().rev().map(|s| s.to_string()).collect()),
            calls: Cell::new(0),
        }
    }
}

impl ChatModel for ScriptedModel {
    fn complete(&self, _prompt: &str) -> Result<String, String> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop()
            .ok_or_else(|| "no scripted response".to_string())
    }
}

fn shipping_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("city", FieldKind::String)
            .required()
            .with_display_name("City"),
        FieldDefinition::new("date", FieldKind::Date)
            .required()
            .with_display_name("Date")
            .with_description("when to ship"),
        FieldDefinition::new("note", FieldKind::String),
    ]
}

#[test]
fn test_complete_arguments_execute_immediately() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state.detect(
        ToolCallRequest::new("call-1", "ship_order")
            .with_argument("city", json!("Oslo"))
            .with_argument("date", json!("2026-09-01")),
    );
    assert_eq!(state.status, ToolCallStatus::ToolCallDetected);

    let outcome = machine
        .process_tool_call(&mut state, &shipping_fields())
        .expect("Processing should succeed");

    let ProcessOutcome::Completed(result) = outcome else {
        panic!("Expected Completed, got {:?}", outcome);
    };
    assert!(result.success);
    assert_eq!(result.result.as_deref(), Some("ok:ship_order"));
    assert_eq!(result.tool_call_id, "call-1");

    assert_eq!(state.status, ToolCallStatus::ToolCompleted);
    assert_eq!(state.completed_results.len(), 1);
    assert_eq!(executor.calls.borrow().len(), 1);
    assert_eq!(executor.calls.borrow()[0]["city"], "Oslo");
    // The model was never needed.
    assert_eq!(model.calls.get(), 0);
}

#[test]
fn test_missing_parameters_pause_with_combined_question() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state.detect(ToolCallRequest::new("call-1", "ship_order"));

    let outcome = machine
        .process_tool_call(&mut state, &shipping_fields())
        .expect("Processing should succeed");

    let ProcessOutcome::NeedMoreParams { question, missing } = outcome else {
        panic!("Expected NeedMoreParams");
    };
    assert_eq!(missing, vec!["city".to_string(), "date".to_string()]);
    assert_eq!(
        question,
        "Please provide the following information:\n1. City\n2. Date (when to ship)"
    );

    assert_eq!(state.status, ToolCallStatus::WaitingUserInput);
    assert!(state.should_pause());
    assert_eq!(state.current_round, 1);
    assert_eq!(state.next_question.as_deref(), Some(question.as_str()));
    assert!(executor.calls.borrow().is_empty());
}

#[test]
fn test_model_arguments_override_collected_values() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state
        .collected_params
        .insert("city".to_string(), json!("Oslo"));
    state.detect(
        ToolCallRequest::new("call-1", "ship_order")
            .with_argument("city", json!("Bergen"))
            .with_argument("date", json!("2026-09-01")),
    );

    let outcome = machine
        .process_tool_call(&mut state, &shipping_fields())
        .expect("Processing should succeed");

    assert!(matches!(outcome, ProcessOutcome::Completed(_)));
    assert_eq!(executor.calls.borrow()[0]["city"], "Bergen");
}

#[test]
fn test_continue_collection_extracts_and_reasks() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[
        r#"{"city": "Oslo", "date": null}"#,
        r#"{"date": "2026-09-01"}"#,
    ]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);
    let fields = shipping_fields();

    let mut state = ToolCallState::new();
    state.detect(ToolCallRequest::new("call-1", "ship_order"));
    machine
        .process_tool_call(&mut state, &fields)
        .expect("Processing should succeed");

    // First answer only covers the city.
    let outcome = machine
        .continue_collection(&mut state, &fields, "Ship it to Oslo please")
        .expect("Continuation should succeed");
    let ProcessOutcome::NeedMoreParams { question, missing } = outcome else {
        panic!("Expected NeedMoreParams");
    };
    assert_eq!(missing, vec!["date".to_string()]);
    assert_eq!(question, "Please provide Date (when to ship).");
    assert_eq!(state.current_round, 2);

    // Second answer completes the set and the tool runs.
    let outcome = machine
        .continue_collection(&mut state, &fields, "tomorrow works")
        .expect("Continuation should succeed");
    assert!(matches!(outcome, ProcessOutcome::Completed(_)));

    assert_eq!(state.collected_params["city"], "Oslo");
    assert_eq!(state.collected_params["date"], "2026-09-01");
    assert_eq!(executor.calls.borrow().len(), 1);
    assert_eq!(model.calls.get(), 2);
}

#[test]
fn test_round_limit_skips_before_calling_the_model() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[r#"{"city": "Oslo"}"#]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);
    let fields = shipping_fields();

    let mut state = ToolCallState::new();
    state.detect(ToolCallRequest::new("call-1", "ship_order"));
    state.max_rounds = 2;
    state.current_round = 2;
    state.missing_params = vec!["city".to_string()];
    state.status = ToolCallStatus::WaitingUserInput;

    let outcome = machine
        .continue_collection(&mut state, &fields, "Oslo")
        .expect("Continuation should succeed");

    let ProcessOutcome::Skipped { reason } = outcome else {
        panic!("Expected Skipped");
    };
    assert!(reason.contains("2 rounds"));
    assert_eq!(state.status, ToolCallStatus::Skipped);
    // Neither the extractor nor the tool ran.
    assert_eq!(model.calls.get(), 0);
    assert!(executor.calls.borrow().is_empty());
}

#[test]
fn test_placeholder_values_count_as_missing() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state.detect(
        ToolCallRequest::new("call-1", "ship_order")
            .with_argument("city", Value::Null)
            .with_argument("date", json!("null")),
    );

    let outcome = machine
        .process_tool_call(&mut state, &shipping_fields())
        .expect("Processing should succeed");

    let ProcessOutcome::NeedMoreParams { missing, .. } = outcome else {
        panic!("Expected NeedMoreParams");
    };
    assert_eq!(missing, vec!["city".to_string(), "date".to_string()]);

    // "Null" and the empty string are placeholders too.
    let mut state = ToolCallState::new();
    state.detect(
        ToolCallRequest::new("call-2", "ship_order")
            .with_argument("city", json!("Null"))
            .with_argument("date", json!("")),
    );
    let outcome = machine
        .process_tool_call(&mut state, &shipping_fields())
        .expect("Processing should succeed");
    let ProcessOutcome::NeedMoreParams { missing, .. } = outcome else {
        panic!("Expected NeedMoreParams");
    };
    assert_eq!(missing, vec!["city".to_string(), "date".to_string()]);
}

#[test]
fn test_false_and_zero_are_usable_values() {
    let fields = vec![
        FieldDefinition::new("express", FieldKind::Boolean).required(),
        FieldDefinition::new("boxes", FieldKind::Integer).required(),
    ];
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state.detect(
        ToolCallRequest::new("call-1", "ship_order")
            .with_argument("express", json!(false))
            .with_argument("boxes", json!(0)),
    );

    let outcome = machine
        .process_tool_call(&mut state, &fields)
        .expect("Processing should succeed");
    assert!(matches!(outcome, ProcessOutcome::Completed(_)));
}

#[test]
fn test_configured_followup_question_is_used_verbatim() {
    let fields = vec![
        FieldDefinition::new("city", FieldKind::String)
            .required()
            .with_followup_question("Which city should we ship to?"),
    ];
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state.detect(ToolCallRequest::new("call-1", "ship_order"));

    let outcome = machine
        .process_tool_call(&mut state, &fields)
        .expect("Processing should succeed");
    let ProcessOutcome::NeedMoreParams { question, .. } = outcome else {
        panic!("Expected NeedMoreParams");
    };
    assert_eq!(question, "Which city should we ship to?");
}

#[test]
fn test_failed_execution_is_recorded() {
    let executor = RecordingExecutor::failing("upstream timeout");
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state.detect(
        ToolCallRequest::new("call-1", "ship_order")
            .with_argument("city", json!("Oslo"))
            .with_argument("date", json!("2026-09-01")),
    );

    let outcome = machine
        .process_tool_call(&mut state, &shipping_fields())
        .expect("Processing should succeed");

    let ProcessOutcome::Failed(result) = outcome else {
        panic!("Expected Failed");
    };
    assert!(!result.success);
    assert_eq!(result.result, None);
    assert_eq!(result.error_message.as_deref(), Some("upstream timeout"));

    assert_eq!(state.status, ToolCallStatus::ToolFailed);
    assert_eq!(state.completed_results.len(), 1);
    assert!(!state.completed_results[0].success);
}

#[test]
fn test_processing_without_a_call_is_an_error() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    let error = machine
        .process_tool_call(&mut state, &shipping_fields())
        .unwrap_err();
    let ToolCallError::NoPendingCall { status } = error;
    assert_eq!(status, "IDLE");
}

#[test]
fn test_state_checkpoint_roundtrip() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);

    let mut state = ToolCallState::new();
    state.paused_node_id = Some("llm_1".to_string());
    state.llm_message = Some("I need to call ship_order".to_string());
    state.extraction_session_id = Some(Uuid::new_v4());
    state.detect(ToolCallRequest::new("call-1", "ship_order"));
    machine
        .process_tool_call(&mut state, &shipping_fields())
        .expect("Processing should succeed");

    let checkpoint = serde_json::to_string(&state).expect("State should serialize");
    // The wire format is camelCase, like the rest of the crate's JSON.
    assert!(checkpoint.contains("\"currentToolCall\""));
    assert!(checkpoint.contains("\"maxRounds\":5"));
    assert!(checkpoint.contains("\"WAITING_USER_INPUT\""));

    let restored: ToolCallState =
        serde_json::from_str(&checkpoint).expect("State should deserialize");
    assert_eq!(restored, state);
}

#[test]
fn test_pending_queue_is_serviced_in_order() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);
    let fields = vec![FieldDefinition::new("note", FieldKind::String)];

    let mut state = ToolCallState::new();
    state.queue_call(ToolCallRequest::new("call-1", "first_tool"));
    state.queue_call(ToolCallRequest::new("call-2", "second_tool"));

    while let Some(request) = state.take_next_pending() {
        state.detect(request);
        let outcome = machine
            .process_tool_call(&mut state, &fields)
            .expect("Processing should succeed");
        assert!(matches!(outcome, ProcessOutcome::Completed(_)));
    }

    assert_eq!(state.completed_results.len(), 2);
    assert_eq!(state.completed_results[0].tool_name, "first_tool");
    assert_eq!(state.completed_results[1].tool_name, "second_tool");
    assert!(state.take_next_pending().is_none());
}

#[test]
fn test_reset_returns_state_to_idle() {
    let executor = RecordingExecutor::succeeding();
    let model = ScriptedModel::new(&[]);
    let extractor = SlotExtractor::new(&model);
    let machine = ToolCallStateMachine::new(&executor, &extractor);
    let fields = vec![FieldDefinition::new("note", FieldKind::String)];

    let mut state = ToolCallState::new();
    state.max_rounds = 3;
    state.queue_call(ToolCallRequest::new("call-2", "second_tool"));
    state.detect(ToolCallRequest::new("call-1", "ship_order"));
    machine
        .process_tool_call(&mut state, &fields)
        .expect("Processing should succeed");

    state.reset();

    assert_eq!(state.status, ToolCallStatus::Idle);
    assert_eq!(state.current_tool_call, None);
    assert!(state.pending_tool_calls.is_empty());
    assert!(state.completed_results.is_empty());
    assert!(state.collected_params.is_empty());
    assert_eq!(state.current_round, 0);
    assert_eq!(state.next_question, None);
    // The round limit is configuration, not call state.
    assert_eq!(state.max_rounds, 3);
}
