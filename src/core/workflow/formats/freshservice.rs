//! Service-desk automation format.
//!
//! ```json
//! {
//!   "states": { "New": { "is_initial": true, "description": "..." } },
//!   "transitions": [
//!     { "from_state": "New", "to_state": "Open",
//!       "conditions": [{ "field": "assignee", "operator": "is not", "value": null }],
//!       "actions": [{ "type": "notify", "parameters": { "template": "assigned" } }] }
//!   ]
//! }
//! ```

use super::fields;
use super::{WorkflowContent, WorkflowFormat, WorkflowParser};
use crate::core::error::{Result, WorkflowError};
use crate::core::workflow::schema::{
    Action, Condition, Properties, Transition, UnifiedWorkflow, WorkflowState,
};
use serde_json::Value;

const CONTEXT: &str = "Fresh Service workflow";

/// Parser for the service-desk automation format.
///
/// Every field of a source state object is kept in the state's `properties`, so
/// unknown fields survive a round trip through this format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshserviceParser;

impl FreshserviceParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_state(name: &str, raw: &Value) -> Result<WorkflowState> {
        let context = format!("{} state '{}'", CONTEXT, name);
        let record = fields::as_object(raw, &context, "state definition")?;
        Ok(WorkflowState {
            name: name.to_string(),
            description: fields::optional_string(record, "description", &context)?,
            is_initial: fields::optional_bool(record, "is_initial", &context)?,
            is_terminal: fields::optional_bool(record, "is_terminal", &context)?,
            properties: record.clone(),
        })
    }

    fn parse_transition(index: usize, raw: &Value) -> Result<Transition> {
        let context = format!("{} transition #{}", CONTEXT, index);
        let record = fields::as_object(raw, &context, "transition")?;
        let from_state = fields::required_string(record, "from_state", CONTEXT)?;
        let to_state = fields::required_string(record, "to_state", CONTEXT)?;

        let conditions = fields::optional_array(record, "conditions", &context)?
            .iter()
            .map(|raw| -> Result<Condition> {
                let entry = fields::as_object(raw, &context, "condition")?;
                Ok(Condition {
                    field: fields::optional_string(entry, "field", &context)?.unwrap_or_default(),
                    operator: fields::optional_string(entry, "operator", &context)?
                        .unwrap_or_default(),
                    value: entry.get("value").cloned().unwrap_or(Value::Null),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let actions = fields::optional_array(record, "actions", &context)?
            .iter()
            .map(|raw| -> Result<Action> {
                let entry = fields::as_object(raw, &context, "action")?;
                Ok(Action {
                    action_type: fields::optional_string(entry, "type", &context)?
                        .unwrap_or_default(),
                    parameters: fields::optional_object(entry, "parameters", &context)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Transition {
            from_state,
            to_state,
            conditions,
            actions,
        })
    }

    fn serialize_state(state: &WorkflowState) -> Value {
        let mut record = Properties::new();
        record.insert(
            "description".to_string(),
            state
                .description
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        record.insert("is_initial".to_string(), Value::Bool(state.is_initial));
        record.insert("is_terminal".to_string(), Value::Bool(state.is_terminal));
        // Stored properties are applied last and win over the explicit keys.
        for (key, value) in &state.properties {
            record.insert(key.clone(), value.clone());
        }
        Value::Object(record)
    }

    fn serialize_transition(transition: &Transition) -> Value {
        let conditions = transition
            .conditions
            .iter()
            .map(|condition| {
                let mut entry = Properties::new();
                entry.insert("field".into(), Value::String(condition.field.clone()));
                entry.insert("operator".into(), Value::String(condition.operator.clone()));
                entry.insert("value".into(), condition.value.clone());
                Value::Object(entry)
            })
            .collect();
        let actions = transition
            .actions
            .iter()
            .map(|action| {
                let mut entry = Properties::new();
                entry.insert("type".into(), Value::String(action.action_type.clone()));
                entry.insert(
                    "parameters".into(),
                    Value::Object(action.parameters.clone()),
                );
                Value::Object(entry)
            })
            .collect();

        let mut record = Properties::new();
        record.insert(
            "from_state".into(),
            Value::String(transition.from_state.clone()),
        );
        record.insert("to_state".into(), Value::String(transition.to_state.clone()));
        record.insert("conditions".into(), Value::Array(conditions));
        record.insert("actions".into(), Value::Array(actions));
        Value::Object(record)
    }
}

impl WorkflowParser for FreshserviceParser {
    fn format(&self) -> WorkflowFormat {
        WorkflowFormat::Freshservice
    }

    fn parse(&self, content: &WorkflowContent) -> Result<UnifiedWorkflow> {
        let root = fields::root_object(content, CONTEXT)?;
        let states = root.get("states").ok_or_else(|| {
            WorkflowError::parse(format!("Missing required field in {}: 'states'", CONTEXT))
        })?;
        let states = fields::as_object(states, CONTEXT, "'states'")?;
        let transitions = match root.get("transitions") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(WorkflowError::parse(format!(
                    "Error parsing {}: 'transitions' must be a list, got {}",
                    CONTEXT,
                    fields::type_name(other)
                )))
            }
            None => {
                return Err(WorkflowError::parse(format!(
                    "Missing required field in {}: 'transitions'",
                    CONTEXT
                )))
            }
        };

        let mut workflow = UnifiedWorkflow::new(self.format().as_str());
        for (name, raw) in states {
            workflow.add_state(Self::parse_state(name, raw)?);
        }
        for (index, raw) in transitions.iter().enumerate() {
            workflow.add_transition(Self::parse_transition(index, raw)?);
        }

        tracing::debug!(
            format = %self.format(),
            states = workflow.states.len(),
            transitions = workflow.transitions.len(),
            "parsed workflow"
        );
        Ok(workflow)
    }

    fn serialize(&self, workflow: &UnifiedWorkflow) -> Result<WorkflowContent> {
        let states: Properties = workflow
            .states
            .iter()
            .map(|(name, state)| (name.clone(), Self::serialize_state(state)))
            .collect();
        let transitions: Vec<Value> = workflow
            .transitions
            .iter()
            .map(Self::serialize_transition)
            .collect();

        let mut root = Properties::new();
        root.insert("states".into(), Value::Object(states));
        root.insert("transitions".into(), Value::Array(transitions));

        tracing::debug!(
            format = %self.format(),
            states = workflow.states.len(),
            transitions = workflow.transitions.len(),
            "serialized workflow"
        );
        Ok(WorkflowContent::Structured(Value::Object(root)))
    }
}
