//! # Slot Filling
//!
//! Multi-turn parameter collection for tool calls.
//!
//! When a model decides to call a tool it rarely supplies every required
//! argument up front. This module turns that gap into a short conversation:
//!
//! 1. the host records the call on a [`ToolCallState`] and asks the
//!    [`ToolCallStateMachine`] to process it,
//! 2. the machine checks the tool's required fields, runs the tool if they
//!    are all present, and otherwise answers with a follow-up question,
//! 3. each user reply is fed back through [`continue_collection`], which
//!    extracts values for the still-missing fields with a [`SlotExtractor`]
//!    and either runs the tool or asks again,
//! 4. after a bounded number of rounds the call is skipped instead of
//!    looping forever.
//!
//! The state is plain serde data so hosts can checkpoint it between turns.
//!
//! ```
//! use rensa::error::ToolExecutionError;
//! use rensa::slotfill::{
//!     ChatModel, ProcessOutcome, SlotExtractor, ToolCallRequest, ToolCallState,
//!     ToolCallStateMachine, ToolExecutor,
//! };
//! use rensa::tool::{FieldDefinition, FieldKind};
//! use serde_json::{Map, Value};
//! use uuid::Uuid;
//!
//! struct EchoTool;
//!
//! impl ToolExecutor for EchoTool {
//!     fn execute(
//!         &self,
//!         _tool_name: &str,
//!         _tool_id: Option<Uuid>,
//!         params: &Map<String, Value>,
//!     ) -> Result<String, ToolExecutionError> {
//!         Ok(format!("shipped to {}", params["city"]))
//!     }
//! }
//!
//! struct CityModel;
//!
//! impl ChatModel for CityModel {
//!     fn complete(&self, _prompt: &str) -> Result<String, String> {
//!         Ok(r#"{"city": "Oslo"}"#.to_string())
//!     }
//! }
//!
//! let fields = vec![FieldDefinition::new("city", FieldKind::String).required()];
//! let executor = EchoTool;
//! let model = CityModel;
//! let extractor = SlotExtractor::new(&model);
//! let machine = ToolCallStateMachine::new(&executor, &extractor);
//!
//! let mut state = ToolCallState::new();
//! state.detect(ToolCallRequest::new("call-1", "ship_order"));
//!
//! // The model supplied no arguments, so the machine asks for the city.
//! let outcome = machine.process_tool_call(&mut state, &fields).unwrap();
//! assert!(matches!(outcome, ProcessOutcome::NeedMoreParams { .. }));
//! assert!(state.should_pause());
//!
//! // The user answers, the extractor fills the slot and the tool runs.
//! let outcome = machine
//!     .continue_collection(&mut state, &fields, "Send it to Oslo")
//!     .unwrap();
//! assert!(matches!(outcome, ProcessOutcome::Completed(_)));
//! ```
//!
//! [`continue_collection`]: ToolCallStateMachine::continue_collection

pub mod extractor;
pub mod machine;
pub mod state;

pub use extractor::{ChatModel, SlotExtractor};
pub use machine::{ProcessOutcome, ToolCallStateMachine, ToolExecutor};
pub use state::{ToolCallRequest, ToolCallResult, ToolCallState, ToolCallStatus};
