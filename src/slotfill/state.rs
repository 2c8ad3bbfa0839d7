//! # Tool Call State
//!
//! Serializable state for the slot-filling lifecycle. A host keeps one
//! [`ToolCallState`] per conversation, checkpoints it between turns (it is
//! plain serde data) and hands it back to the
//! [`ToolCallStateMachine`](crate::slotfill::ToolCallStateMachine) together
//! with the tool's field definitions whenever the user replies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Lifecycle status of a tool call.
///
/// Statuses are serialized in screaming snake case so checkpoints stay
/// readable next to the rest of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolCallStatus {
    /// No tool call in flight.
    Idle,
    /// A model response carried a tool call that has not been processed yet.
    ToolCallDetected,
    /// Parameters are being extracted from a user reply.
    ExtractingParams,
    /// A follow-up question was asked and the workflow is paused.
    WaitingUserInput,
    /// The tool is running.
    ExecutingTool,
    /// The tool ran and produced a result.
    ToolCompleted,
    /// The tool ran and reported an error.
    ToolFailed,
    /// Collection hit the round limit and the call was abandoned.
    Skipped,
}

impl Default for ToolCallStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for ToolCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::ToolCallDetected => "TOOL_CALL_DETECTED",
            Self::ExtractingParams => "EXTRACTING_PARAMS",
            Self::WaitingUserInput => "WAITING_USER_INPUT",
            Self::ExecutingTool => "EXECUTING_TOOL",
            Self::ToolCompleted => "TOOL_COMPLETED",
            Self::ToolFailed => "TOOL_FAILED",
            Self::Skipped => "SKIPPED",
        };
        write!(f, "{}", name)
    }
}

/// A tool call as reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRequest {
    /// Call id assigned by the model provider.
    pub id: String,

    /// Name of the tool the model wants to invoke.
    pub tool_name: String,

    /// Registry id of the tool, when the host resolved one.
    #[serde(default)]
    pub tool_id: Option<Uuid>,

    /// Arguments the model supplied. Missing or `null` becomes an empty map.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            tool_id: None,
            arguments: Map::new(),
        }
    }

    pub fn with_tool_id(mut self, tool_id: Uuid) -> Self {
        self.tool_id = Some(tool_id);
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }
}

/// Outcome of one executed tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Id of the request this result answers.
    pub tool_call_id: String,

    /// Name of the tool that ran.
    pub tool_name: String,

    /// Whether the tool reported success.
    pub success: bool,

    /// Tool output on success.
    #[serde(default)]
    pub result: Option<String>,

    /// Error message on failure.
    #[serde(default)]
    pub error_message: Option<String>,

    /// Wall-clock duration of the execution in milliseconds.
    pub duration_ms: u64,
}

/// Checkpointable state of the slot-filling conversation.
///
/// Everything the state machine needs to resume after a pause lives here:
/// the call being serviced, the parameters gathered so far, which required
/// ones are still missing, and how many question rounds have been spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallState {
    /// Where in the lifecycle this call currently is.
    #[serde(default)]
    pub status: ToolCallStatus,

    /// The call currently being serviced.
    #[serde(default)]
    pub current_tool_call: Option<ToolCallRequest>,

    /// Calls queued behind the current one, serviced one at a time.
    #[serde(default)]
    pub pending_tool_calls: Vec<ToolCallRequest>,

    /// Results of calls that already ran in this conversation.
    #[serde(default)]
    pub completed_results: Vec<ToolCallResult>,

    /// Correlation id for the extraction exchange, when the host tracks one.
    #[serde(default)]
    pub extraction_session_id: Option<Uuid>,

    /// Parameter values gathered so far, across all rounds.
    #[serde(default)]
    pub collected_params: Map<String, Value>,

    /// Required parameters still unanswered after the last check.
    #[serde(default)]
    pub missing_params: Vec<String>,

    /// The follow-up question to show the user, when paused.
    #[serde(default)]
    pub next_question: Option<String>,

    /// Question rounds already spent on the current call.
    #[serde(default)]
    pub current_round: u32,

    /// Round limit before the call is skipped.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Node the workflow paused on, so the host can resume at the same spot.
    #[serde(default)]
    pub paused_node_id: Option<String>,

    /// The assistant message that carried the tool call, kept for replay.
    #[serde(default)]
    pub llm_message: Option<String>,
}

fn default_max_rounds() -> u32 {
    5
}

impl Default for ToolCallState {
    fn default() -> Self {
        Self {
            status: ToolCallStatus::Idle,
            current_tool_call: None,
            pending_tool_calls: Vec::new(),
            completed_results: Vec::new(),
            extraction_session_id: None,
            collected_params: Map::new(),
            missing_params: Vec::new(),
            next_question: None,
            current_round: 0,
            max_rounds: default_max_rounds(),
            paused_node_id: None,
            llm_message: None,
        }
    }
}

impl ToolCallState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `request` as the call being serviced.
    pub fn detect(&mut self, request: ToolCallRequest) {
        self.current_tool_call = Some(request);
        self.status = ToolCallStatus::ToolCallDetected;
    }

    /// Queue a call behind the current one.
    pub fn queue_call(&mut self, request: ToolCallRequest) {
        self.pending_tool_calls.push(request);
    }

    /// Pop the next queued call, oldest first.
    pub fn take_next_pending(&mut self) -> Option<ToolCallRequest> {
        if self.pending_tool_calls.is_empty() {
            None
        } else {
            Some(self.pending_tool_calls.remove(0))
        }
    }

    /// Record a finished call.
    pub fn push_result(&mut self, result: ToolCallResult) {
        self.completed_results.push(result);
    }

    /// Whether the surrounding workflow has to pause for user input.
    pub fn should_pause(&self) -> bool {
        self.status == ToolCallStatus::WaitingUserInput
    }

    /// Whether every required parameter has been gathered.
    pub fn has_all_params(&self) -> bool {
        self.missing_params.is_empty()
    }

    /// Clear the state back to idle so it can serve an unrelated call.
    /// The round limit is configuration and survives.
    pub fn reset(&mut self) {
        self.status = ToolCallStatus::Idle;
        self.current_tool_call = None;
        self.pending_tool_calls.clear();
        self.completed_results.clear();
        self.extraction_session_id = None;
        self.collected_params = Map::new();
        self.missing_params.clear();
        self.next_question = None;
        self.current_round = 0;
        self.paused_node_id = None;
        self.llm_message = None;
    }
}
