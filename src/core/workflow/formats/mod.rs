//! Native workflow formats and the parser/serializer pair for each.

use crate::core::error::{Result, WorkflowError};
use crate::core::workflow::schema::{Properties, UnifiedWorkflow};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub mod freshservice;
pub mod jsm;
pub mod mermaid;

pub use freshservice::FreshserviceParser;
pub use jsm::JsmParser;
pub use mermaid::MermaidParser;

/// Closed set of formats the transpiler dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkflowFormat {
    /// Service-desk automation format (`states` mapping + `transitions`).
    Freshservice,
    /// Issue-tracker transition rules (`statuses` + `rules`).
    Jsm,
    /// Line-oriented state-diagram text.
    Mermaid,
}

impl WorkflowFormat {
    pub const ALL: [WorkflowFormat; 3] = [
        WorkflowFormat::Freshservice,
        WorkflowFormat::Jsm,
        WorkflowFormat::Mermaid,
    ];

    /// Stable identifier used for dispatch and recorded as workflow `source`.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowFormat::Freshservice => "freshservice",
            WorkflowFormat::Jsm => "jsm",
            WorkflowFormat::Mermaid => "mermaid",
        }
    }

    /// Short token accepted on the command line.
    pub fn short_token(&self) -> &'static str {
        match self {
            WorkflowFormat::Freshservice => "fs",
            WorkflowFormat::Jsm => "jsm",
            WorkflowFormat::Mermaid => "mermaid",
        }
    }

    /// Shape of content this format reads and writes.
    pub fn content_kind(&self) -> ContentKind {
        match self {
            WorkflowFormat::Freshservice | WorkflowFormat::Jsm => ContentKind::Structured,
            WorkflowFormat::Mermaid => ContentKind::Text,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            WorkflowFormat::Freshservice => 0,
            WorkflowFormat::Jsm => 1,
            WorkflowFormat::Mermaid => 2,
        }
    }
}

impl fmt::Display for WorkflowFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowFormat {
    type Err = WorkflowError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "freshservice" | "fs" => Ok(WorkflowFormat::Freshservice),
            "jsm" => Ok(WorkflowFormat::Jsm),
            "mermaid" => Ok(WorkflowFormat::Mermaid),
            other => Err(WorkflowError::transpiler(format!(
                "Unsupported format type: '{}'",
                other
            ))),
        }
    }
}

/// Whether a format exchanges a tree of mappings/sequences or plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Structured,
    Text,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Structured => write!(f, "structured"),
            ContentKind::Text => write!(f, "text"),
        }
    }
}

/// Raw input to a parser, or output of a serializer.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowContent {
    Structured(Value),
    Text(String),
}

impl WorkflowContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            WorkflowContent::Structured(_) => ContentKind::Structured,
            WorkflowContent::Text(_) => ContentKind::Text,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            WorkflowContent::Structured(value) => Some(value),
            WorkflowContent::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            WorkflowContent::Text(text) => Some(text),
            WorkflowContent::Structured(_) => None,
        }
    }

    pub fn into_structured(self) -> Option<Value> {
        match self {
            WorkflowContent::Structured(value) => Some(value),
            WorkflowContent::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            WorkflowContent::Text(text) => Some(text),
            WorkflowContent::Structured(_) => None,
        }
    }
}

impl From<Value> for WorkflowContent {
    fn from(value: Value) -> Self {
        WorkflowContent::Structured(value)
    }
}

impl From<String> for WorkflowContent {
    fn from(text: String) -> Self {
        WorkflowContent::Text(text)
    }
}

impl From<&str> for WorkflowContent {
    fn from(text: &str) -> Self {
        WorkflowContent::Text(text.to_string())
    }
}

/// Converts one native format into the unified model and back.
///
/// Implementations hold no per-call state and may be shared across threads.
pub trait WorkflowParser: Send + Sync {
    fn format(&self) -> WorkflowFormat;

    fn parse(&self, content: &WorkflowContent) -> Result<UnifiedWorkflow>;

    fn serialize(&self, workflow: &UnifiedWorkflow) -> Result<WorkflowContent>;
}

/// Accessors for reading loosely-typed structured records. Each error names the
/// record kind (`context`) and field so messages point at the offending input.
pub(crate) mod fields {
    use super::*;

    pub fn root_object<'a>(content: &'a WorkflowContent, context: &str) -> Result<&'a Properties> {
        match content {
            WorkflowContent::Structured(Value::Object(map)) => Ok(map),
            WorkflowContent::Structured(other) => Err(WorkflowError::parse(format!(
                "Error parsing {}: expected an object at the top level, got {}",
                context,
                type_name(other)
            ))),
            WorkflowContent::Text(_) => Err(WorkflowError::parse(format!(
                "Error parsing {}: expected structured content, got text",
                context
            ))),
        }
    }

    pub fn as_object<'a>(value: &'a Value, context: &str, what: &str) -> Result<&'a Properties> {
        value.as_object().ok_or_else(|| {
            WorkflowError::parse(format!(
                "Error parsing {}: {} must be an object, got {}",
                context,
                what,
                type_name(value)
            ))
        })
    }

    pub fn optional_array<'a>(
        record: &'a Properties,
        key: &str,
        context: &str,
    ) -> Result<&'a [Value]> {
        match record.get(key) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(WorkflowError::parse(format!(
                "Error parsing {}: '{}' must be a list, got {}",
                context,
                key,
                type_name(other)
            ))),
        }
    }

    pub fn required_string(record: &Properties, key: &str, context: &str) -> Result<String> {
        match record.get(key) {
            Some(Value::String(value)) => Ok(value.clone()),
            None => Err(WorkflowError::parse(format!(
                "Missing required field in {}: '{}'",
                context, key
            ))),
            Some(other) => Err(WorkflowError::parse(format!(
                "Error parsing {}: '{}' must be a string, got {}",
                context,
                key,
                type_name(other)
            ))),
        }
    }

    pub fn optional_string(record: &Properties, key: &str, context: &str) -> Result<Option<String>> {
        match record.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(other) => Err(WorkflowError::parse(format!(
                "Error parsing {}: '{}' must be a string, got {}",
                context,
                key,
                type_name(other)
            ))),
        }
    }

    pub fn optional_bool(record: &Properties, key: &str, context: &str) -> Result<bool> {
        match record.get(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(WorkflowError::parse(format!(
                "Error parsing {}: '{}' must be a boolean, got {}",
                context,
                key,
                type_name(other)
            ))),
        }
    }

    pub fn optional_object(record: &Properties, key: &str, context: &str) -> Result<Properties> {
        match record.get(key) {
            None | Some(Value::Null) => Ok(Properties::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(other) => Err(WorkflowError::parse(format!(
                "Error parsing {}: '{}' must be an object, got {}",
                context,
                key,
                type_name(other)
            ))),
        }
    }

    pub fn type_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "list",
            Value::Object(_) => "object",
        }
    }
}
