//! Wire-facing types for the tool-calling contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token correlating a tool-call request with its result.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CallId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CallId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Primitive type of a declared tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
}

/// One named parameter within a [`ParameterSchema`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub param_type: ParameterType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Named-field parameter shape advertised alongside a declaration.
///
/// `BTreeMap` keeps field order stable when the schema is serialized
/// into a model request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub properties: BTreeMap<String, ParameterSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Chainable, for building schemas inline.
    pub fn field(
        mut self,
        name: &str,
        param_type: ParameterType,
        description: &str,
        required: bool,
    ) -> Self {
        self.properties.insert(
            name.to_string(),
            ParameterSpec {
                param_type,
                description: Some(description.to_string()),
            },
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// A capability advertised to the model at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,

    /// `None` means the tool takes no arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterSchema>,
}

impl ToolDeclaration {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: ParameterSchema) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// A tool invocation emitted by the agent mid-conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub call_id: CallId,
    pub tool: String,

    /// Argument map as produced by the model. May be malformed; the
    /// handler boundary surfaces that as a failure, never a crash.
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCallRequest {
    /// Build a request with a fresh call id.
    pub fn new(tool: &str, arguments: serde_json::Value) -> Self {
        Self {
            call_id: CallId::generate(),
            tool: tool.to_string(),
            arguments,
        }
    }
}

/// How a single tool call ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallOutcome {
    Success { payload: serde_json::Value },
    Failure { error: String },
}

/// Outcome of one tool call, fed back into the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub call_id: CallId,
    pub tool: String,
    pub outcome: CallOutcome,
}

impl ToolCallResult {
    pub fn success(call_id: CallId, tool: &str, payload: serde_json::Value) -> Self {
        Self {
            call_id,
            tool: tool.to_string(),
            outcome: CallOutcome::Success { payload },
        }
    }

    pub fn failure(call_id: CallId, tool: &str, error: impl Into<String>) -> Self {
        Self {
            call_id,
            tool: tool.to_string(),
            outcome: CallOutcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, CallOutcome::Failure { .. })
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            CallOutcome::Success { payload } => Some(payload),
            CallOutcome::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            CallOutcome::Success { .. } => None,
            CallOutcome::Failure { error } => Some(error),
        }
    }
}
