//! Tool abstraction types — the contract between the reasoning engine,
//! the registry, and each capability.

use crate::error::{LecternError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// ============================================================================
// Engine-facing schema
// ============================================================================

/// JSON tool definition sent to the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
}

/// JSON Schema for tool input parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Value,
    pub required: Vec<String>,
}

// ============================================================================
// Structured definition
// ============================================================================

/// JSON type of a single tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }

    /// Whether a JSON value is acceptable for this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

impl ToolParam {
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: true,
        }
    }

    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }
}

/// What a capability tells the registry about itself.
///
/// `params` is ordered; the order is kept in the `required` list of the
/// engine-facing schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub params: Vec<ToolParam>,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: ToolParam) -> Self {
        self.params.push(param);
        self
    }

    /// Render the `{name, description, input_schema}` form the LLM consumes.
    pub fn to_tool(&self) -> Tool {
        let mut properties = Map::new();
        for p in &self.params {
            properties.insert(
                p.name.clone(),
                json!({
                    "type": p.param_type.as_str(),
                    "description": p.description,
                }),
            );
        }
        Tool {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: ToolInputSchema {
                schema_type: "object".to_string(),
                properties: Value::Object(properties),
                required: self
                    .params
                    .iter()
                    .filter(|p| p.required)
                    .map(|p| p.name.clone())
                    .collect(),
            },
        }
    }

    /// Check required presence and declared types. `null` counts as absent.
    pub fn validate(&self, input: &Value) -> Result<()> {
        let empty = Map::new();
        let fields = match input {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(LecternError::Validation(format!(
                    "Expected a JSON object for tool '{}', got {}",
                    self.name,
                    json_kind(other)
                )))
            }
        };

        for p in &self.params {
            match fields.get(&p.name) {
                None | Some(Value::Null) => {
                    if p.required {
                        return Err(LecternError::Validation(format!(
                            "Missing required parameter: \"{}\"",
                            p.name
                        )));
                    }
                }
                Some(v) if !p.param_type.accepts(v) => {
                    return Err(LecternError::Validation(format!(
                        "Parameter \"{}\" must be of type {}, got {}",
                        p.name,
                        p.param_type.as_str(),
                        json_kind(v)
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Validate, then deserialize into the capability's typed arguments.
    pub fn parse_args<T: DeserializeOwned>(&self, input: &Value) -> Result<T> {
        self.validate(input)?;
        let value = if input.is_null() {
            Value::Object(Map::new())
        } else {
            input.clone()
        };
        serde_json::from_value(value).map_err(|e| LecternError::Validation(e.to_string()))
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Outcomes and citations
// ============================================================================

/// Classification of tool execution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolErrorKind {
    /// Transient: store unavailable, timeout — worth retrying.
    Transient,
    /// Permanent: bad params, unknown tool or course — retrying won't help.
    Permanent,
}

/// Structured result from a tool execution.
///
/// `content` is always the text handed back to the engine, errors included.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub content: String,
    pub is_error: bool,
    pub error_kind: Option<ToolErrorKind>,
}

impl ToolOutcome {
    pub fn ok(content: String) -> Self {
        Self { content, is_error: false, error_kind: None }
    }

    pub fn transient_error(msg: String) -> Self {
        Self { content: msg, is_error: true, error_kind: Some(ToolErrorKind::Transient) }
    }

    pub fn permanent_error(msg: String) -> Self {
        Self { content: msg, is_error: true, error_kind: Some(ToolErrorKind::Permanent) }
    }
}

impl From<LecternError> for ToolOutcome {
    fn from(err: LecternError) -> Self {
        match err {
            LecternError::Validation(msg) => ToolOutcome::permanent_error(msg),
            other => ToolOutcome::permanent_error(other.to_string()),
        }
    }
}

/// A source surfaced to the UI: display label plus optional deep link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub label: String,
    pub link: Option<String>,
}

impl Citation {
    pub fn new(label: impl Into<String>, link: Option<String>) -> Self {
        Self { label: label.into(), link }
    }
}

// ============================================================================
// ToolHandler trait
// ============================================================================

/// Trait for capabilities that can be registered and dispatched.
///
/// `execute` never returns `Err`: retrieval failures and bad params come back
/// as text in the outcome. Capabilities that track provenance override the
/// citation methods; the defaults report nothing.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Pure description of the tool. Called once at registration.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: &Value) -> ToolOutcome;

    /// Citations produced by the most recent `execute`.
    async fn citations(&self) -> Vec<Citation> {
        Vec::new()
    }

    /// Forget citations from the previous turn.
    async fn reset_citations(&self) {}
}
