use super::{IssueSeverity, ValidationIssue, ValidationRule};
use crate::core::workflow::schema::UnifiedWorkflow;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};

/// Built-in rules in the order their violations are reported.
pub fn built_in_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(HasStatesRule),
        Box::new(HasInitialStateRule),
        Box::new(SingleInitialStateRule),
        Box::new(KnownTransitionStatesRule),
        Box::new(ReachableStatesRule),
        Box::new(TerminalStateExitRule),
        Box::new(ConflictingConditionsRule),
        Box::new(DeadEndStateRule),
    ]
}

pub struct HasStatesRule;

impl ValidationRule for HasStatesRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        if !workflow.states.is_empty() {
            return Vec::new();
        }
        vec![ValidationIssue::new(
            "WF-VAL-001",
            IssueSeverity::Error,
            "Workflow must have at least one state",
            None,
            Some("declare at least one state".to_string()),
        )]
    }
}

pub struct HasInitialStateRule;

impl ValidationRule for HasInitialStateRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        if workflow.initial_states().next().is_some() {
            return Vec::new();
        }
        vec![ValidationIssue::new(
            "WF-VAL-002",
            IssueSeverity::Error,
            "Workflow must have an initial state",
            None,
            Some("flag exactly one state as initial".to_string()),
        )]
    }
}

pub struct SingleInitialStateRule;

impl ValidationRule for SingleInitialStateRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        let initial: Vec<&str> = workflow
            .initial_states()
            .map(|state| state.name.as_str())
            .collect();
        if initial.len() <= 1 {
            return Vec::new();
        }
        vec![ValidationIssue::new(
            "WF-VAL-003",
            IssueSeverity::Error,
            format!(
                "Workflow cannot have multiple initial states: {}",
                initial.join(", ")
            ),
            None,
            Some("keep the initial flag on a single state".to_string()),
        )]
    }
}

pub struct KnownTransitionStatesRule;

impl ValidationRule for KnownTransitionStatesRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        let mut out = Vec::new();
        for transition in &workflow.transitions {
            let location = Some(format!(
                "{} -> {}",
                transition.from_state, transition.to_state
            ));
            if !workflow.states.contains_key(&transition.from_state) {
                out.push(ValidationIssue::new(
                    "WF-VAL-004",
                    IssueSeverity::Error,
                    format!("Invalid from_state in transition: {}", transition.from_state),
                    location.clone(),
                    Some("point transitions at declared states".to_string()),
                ));
            }
            if !workflow.states.contains_key(&transition.to_state) {
                out.push(ValidationIssue::new(
                    "WF-VAL-004",
                    IssueSeverity::Error,
                    format!("Invalid to_state in transition: {}", transition.to_state),
                    location,
                    Some("point transitions at declared states".to_string()),
                ));
            }
        }
        out
    }
}

pub struct ReachableStatesRule;

impl ReachableStatesRule {
    /// Names of states not reachable from the first initial state, in state order.
    pub fn unreachable_states(workflow: &UnifiedWorkflow) -> Vec<String> {
        let Some(initial) = workflow.initial_states().next() else {
            return Vec::new();
        };

        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
        for name in workflow.states.keys() {
            nodes.insert(name.as_str(), graph.add_node(name.as_str()));
        }
        for transition in &workflow.transitions {
            let from = nodes.get(transition.from_state.as_str());
            let to = nodes.get(transition.to_state.as_str());
            if let (Some(&from), Some(&to)) = (from, to) {
                graph.update_edge(from, to, ());
            }
        }

        let mut visited = HashSet::new();
        let mut dfs = Dfs::new(&graph, nodes[initial.name.as_str()]);
        while let Some(node) = dfs.next(&graph) {
            visited.insert(graph[node]);
        }

        workflow
            .states
            .keys()
            .filter(|name| !visited.contains(name.as_str()))
            .cloned()
            .collect()
    }
}

impl ValidationRule for ReachableStatesRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        let unreachable = Self::unreachable_states(workflow);
        if unreachable.is_empty() {
            return Vec::new();
        }
        vec![ValidationIssue::new(
            "WF-VAL-005",
            IssueSeverity::Error,
            format!(
                "Following states are unreachable: {}",
                unreachable.join(", ")
            ),
            None,
            Some("connect the states from a reachable transition or remove them".to_string()),
        )]
    }
}

pub struct TerminalStateExitRule;

impl ValidationRule for TerminalStateExitRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        workflow
            .transitions
            .iter()
            .filter(|transition| {
                workflow
                    .states
                    .get(&transition.from_state)
                    .is_some_and(|state| state.is_terminal)
            })
            .map(|transition| {
                ValidationIssue::new(
                    "WF-VAL-006",
                    IssueSeverity::Error,
                    format!(
                        "Terminal state {} cannot have outgoing transitions",
                        transition.from_state
                    ),
                    Some(format!(
                        "{} -> {}",
                        transition.from_state, transition.to_state
                    )),
                    Some("remove the transition or clear the terminal flag".to_string()),
                )
            })
            .collect()
    }
}

pub struct ConflictingConditionsRule;

impl ValidationRule for ConflictingConditionsRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        let mut out = Vec::new();
        for transition in &workflow.transitions {
            let mut seen: HashSet<(&str, &str)> = HashSet::new();
            for condition in &transition.conditions {
                if seen.insert((condition.field.as_str(), condition.operator.as_str())) {
                    continue;
                }
                out.push(ValidationIssue::new(
                    "WF-VAL-007",
                    IssueSeverity::Error,
                    format!(
                        "Conflicting conditions for {} in transition {} -> {}",
                        condition.field, transition.from_state, transition.to_state
                    ),
                    Some(format!(
                        "{} -> {}",
                        transition.from_state, transition.to_state
                    )),
                    Some("merge conditions that share a field and operator".to_string()),
                ));
            }
        }
        out
    }
}

pub struct DeadEndStateRule;

impl ValidationRule for DeadEndStateRule {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        let sources: HashSet<&str> = workflow
            .transitions
            .iter()
            .map(|transition| transition.from_state.as_str())
            .collect();
        workflow
            .states
            .values()
            .filter(|state| !state.is_terminal && !sources.contains(state.name.as_str()))
            .map(|state| {
                ValidationIssue::new(
                    "WF-VAL-008",
                    IssueSeverity::Warning,
                    format!(
                        "state '{}' has no outgoing transitions and is not terminal",
                        state.name
                    ),
                    Some(state.name.clone()),
                    Some("flag the state as terminal or add a transition out of it".to_string()),
                )
            })
            .collect()
    }
}
