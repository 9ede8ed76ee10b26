//! Issue-tracker transition-rule format.
//!
//! Statuses carry no terminal flag; a status is terminal when its
//! `statusCategory` is `DONE`. Only the category, id, and status type are kept
//! as state properties, so unknown status fields do not survive a round trip.

use super::fields;
use super::{WorkflowContent, WorkflowFormat, WorkflowParser};
use crate::core::error::Result;
use crate::core::workflow::schema::{
    Action, Condition, Properties, Transition, UnifiedWorkflow, WorkflowState,
};
use serde_json::Value;

const CONTEXT: &str = "JSM workflow";
const DEFAULT_STATUS_CATEGORY: &str = "TO_DO";
const DONE_STATUS_CATEGORY: &str = "DONE";

pub const STATUS_CATEGORY_KEY: &str = "statusCategory";
pub const JSM_ID_KEY: &str = "jsmId";
pub const JSM_TYPE_KEY: &str = "jsmType";

/// Parser for the issue-tracker transition-rule format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsmParser;

impl JsmParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_status(raw: &Value) -> Result<WorkflowState> {
        let record = fields::as_object(raw, CONTEXT, "status")?;
        let name = fields::required_string(record, "name", CONTEXT)?;
        let context = format!("{} status '{}'", CONTEXT, name);

        let category = record.get(STATUS_CATEGORY_KEY);
        let is_terminal = category.and_then(Value::as_str) == Some(DONE_STATUS_CATEGORY);

        let mut properties = Properties::new();
        properties.insert(
            STATUS_CATEGORY_KEY.to_string(),
            category
                .cloned()
                .unwrap_or_else(|| Value::String(DEFAULT_STATUS_CATEGORY.to_string())),
        );
        properties.insert(
            JSM_ID_KEY.to_string(),
            record.get("id").cloned().unwrap_or(Value::Null),
        );
        properties.insert(
            JSM_TYPE_KEY.to_string(),
            record.get("statusType").cloned().unwrap_or(Value::Null),
        );

        Ok(WorkflowState {
            description: fields::optional_string(record, "description", &context)?,
            is_initial: fields::optional_bool(record, "initial", &context)?,
            is_terminal,
            properties,
            name,
        })
    }

    fn parse_rule(index: usize, raw: &Value) -> Result<Transition> {
        let context = format!("{} rule #{}", CONTEXT, index);
        let record = fields::as_object(raw, &context, "rule")?;
        let from_state = fields::required_string(record, "fromStatus", CONTEXT)?;
        let to_state = fields::required_string(record, "toStatus", CONTEXT)?;

        let conditions = fields::optional_array(record, "conditions", &context)?
            .iter()
            .map(|raw| -> Result<Condition> {
                let entry = fields::as_object(raw, &context, "condition")?;
                let field = match entry.get("field") {
                    None | Some(Value::Null) => String::new(),
                    Some(field) => {
                        let field = fields::as_object(field, &context, "condition field")?;
                        fields::optional_string(field, "name", &context)?.unwrap_or_default()
                    }
                };
                Ok(Condition {
                    field,
                    operator: fields::optional_string(entry, "operator", &context)?
                        .unwrap_or_default(),
                    value: entry.get("value").cloned().unwrap_or(Value::Null),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let actions = fields::optional_array(record, "postFunctions", &context)?
            .iter()
            .map(|raw| -> Result<Action> {
                let entry = fields::as_object(raw, &context, "post function")?;
                Ok(Action {
                    action_type: fields::optional_string(entry, "type", &context)?
                        .unwrap_or_default(),
                    parameters: fields::optional_object(entry, "configuration", &context)?,
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

    fn serialize_status(state: &WorkflowState) -> Value {
        let property = |key: &str| state.properties.get(key).cloned().unwrap_or(Value::Null);

        let mut record = Properties::new();
        record.insert("name".into(), Value::String(state.name.clone()));
        record.insert(
            "description".into(),
            state
                .description
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        record.insert("initial".into(), Value::Bool(state.is_initial));
        record.insert(
            "statusCategory".into(),
            state
                .properties
                .get(STATUS_CATEGORY_KEY)
                .cloned()
                .unwrap_or_else(|| Value::String(DEFAULT_STATUS_CATEGORY.to_string())),
        );
        record.insert("id".into(), property(JSM_ID_KEY));
        record.insert("statusType".into(), property(JSM_TYPE_KEY));
        Value::Object(record)
    }

    fn serialize_rule(transition: &Transition) -> Value {
        let conditions = transition
            .conditions
            .iter()
            .map(|condition| {
                let mut field = Properties::new();
                field.insert("name".into(), Value::String(condition.field.clone()));

                let mut entry = Properties::new();
                entry.insert("field".into(), Value::Object(field));
                entry.insert("operator".into(), Value::String(condition.operator.clone()));
                entry.insert("value".into(), condition.value.clone());
                Value::Object(entry)
            })
            .collect();
        let post_functions = transition
            .actions
            .iter()
            .map(|action| {
                let mut entry = Properties::new();
                entry.insert("type".into(), Value::String(action.action_type.clone()));
                entry.insert(
                    "configuration".into(),
                    Value::Object(action.parameters.clone()),
                );
                Value::Object(entry)
            })
            .collect();

        let mut record = Properties::new();
        record.insert(
            "fromStatus".into(),
            Value::String(transition.from_state.clone()),
        );
        record.insert("toStatus".into(), Value::String(transition.to_state.clone()));
        record.insert("conditions".into(), Value::Array(conditions));
        record.insert("postFunctions".into(), Value::Array(post_functions));
        Value::Object(record)
    }
}

impl WorkflowParser for JsmParser {
    fn format(&self) -> WorkflowFormat {
        WorkflowFormat::Jsm
    }

    fn parse(&self, content: &WorkflowContent) -> Result<UnifiedWorkflow> {
        let root = fields::root_object(content, CONTEXT)?;

        let mut workflow = UnifiedWorkflow::new(self.format().as_str());
        for raw in fields::optional_array(root, "statuses", CONTEXT)? {
            workflow.add_state(Self::parse_status(raw)?);
        }
        for (index, raw) in fields::optional_array(root, "rules", CONTEXT)?
            .iter()
            .enumerate()
        {
            workflow.add_transition(Self::parse_rule(index, raw)?);
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
        let statuses: Vec<Value> = workflow.states.values().map(Self::serialize_status).collect();
        let rules: Vec<Value> = workflow.transitions.iter().map(Self::serialize_rule).collect();

        let mut root = Properties::new();
        root.insert("statuses".into(), Value::Array(statuses));
        root.insert("rules".into(), Value::Array(rules));

        tracing::debug!(
            format = %self.format(),
            states = workflow.states.len(),
            transitions = workflow.transitions.len(),
            "serialized workflow"
        );
        Ok(WorkflowContent::Structured(Value::Object(root)))
    }
}
