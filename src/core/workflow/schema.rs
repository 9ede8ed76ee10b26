use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key/value mapping used for format-specific state properties,
/// action parameters, and workflow metadata.
pub type Properties = Map<String, Value>;

/// Metadata key recording which format a workflow was parsed from.
pub const SOURCE_METADATA_KEY: &str = "source";

/// A named node in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_terminal: bool,
    #[serde(default)]
    pub properties: Properties,
}

impl WorkflowState {
    /// Bare state with no description, flags, or properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_initial: false,
            is_terminal: false,
            properties: Properties::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

/// Single field/operator/value predicate guarding a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// Side effect attached to a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub parameters: Properties,
}

impl Action {
    pub fn new(action_type: impl Into<String>, parameters: Properties) -> Self {
        Self {
            action_type: action_type.into(),
            parameters,
        }
    }
}

/// Directed edge between two states.
///
/// Conditions are a conjunction: all must hold. Actions keep their order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from_state: String,
    pub to_state: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Transition {
    pub fn new(from_state: impl Into<String>, to_state: impl Into<String>) -> Self {
        Self {
            from_state: from_state.into(),
            to_state: to_state.into(),
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// Format-agnostic workflow every parser produces and every serializer consumes.
///
/// The model does not enforce its own invariants; the validator does. This lets
/// parsers build a workflow incrementally through transiently invalid states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedWorkflow {
    pub states: IndexMap<String, WorkflowState>,
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub metadata: Properties,
}

impl UnifiedWorkflow {
    /// Empty workflow tagged with the format it originates from.
    pub fn new(source: &str) -> Self {
        let mut metadata = Properties::new();
        metadata.insert(
            SOURCE_METADATA_KEY.to_string(),
            Value::String(source.to_string()),
        );
        Self {
            states: IndexMap::new(),
            transitions: Vec::new(),
            metadata,
        }
    }

    /// Insert a state keyed by its name, replacing any state with the same name.
    pub fn add_state(&mut self, state: WorkflowState) {
        self.states.insert(state.name.clone(), state);
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn with_state(mut self, state: WorkflowState) -> Self {
        self.add_state(state);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.add_transition(transition);
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_METADATA_KEY).and_then(Value::as_str)
    }

    pub fn initial_states(&self) -> impl Iterator<Item = &WorkflowState> {
        self.states.values().filter(|state| state.is_initial)
    }

    pub fn terminal_states(&self) -> impl Iterator<Item = &WorkflowState> {
        self.states.values().filter(|state| state.is_terminal)
    }
}
