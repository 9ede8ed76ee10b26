use flowbridge::core::workflow::formats::FreshserviceParser;
use flowbridge::core::workflow::{WorkflowContent, WorkflowParser};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> WorkflowContent {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let raw = fs::read_to_string(&path).expect("read fixture");
    let value: Value = serde_json::from_str(&raw).expect("decode fixture");
    WorkflowContent::Structured(value)
}

#[test]
fn parses_simple_workflow() {
    let workflow = FreshserviceParser
        .parse(&fixture("freshservice/simple.json"))
        .expect("parse");

    assert_eq!(workflow.source(), Some("freshservice"));
    assert_eq!(workflow.states.len(), 3);
    assert_eq!(workflow.transitions.len(), 2);

    let new = &workflow.states["New"];
    assert!(new.is_initial);
    assert!(!new.is_terminal);
    assert_eq!(new.description.as_deref(), Some("Ticket created"));
    assert!(workflow.states["Closed"].is_terminal);

    let first = &workflow.transitions[0];
    assert_eq!(first.conditions[0].field, "assignee");
    assert_eq!(first.conditions[0].operator, "is_set");
    assert_eq!(first.conditions[0].value, Value::Null);
    assert_eq!(first.actions[0].action_type, "notify");
    assert_eq!(
        first.actions[0].parameters.get("template"),
        Some(&json!("ticket_assigned"))
    );

    let second = &workflow.transitions[1];
    assert!(second.conditions.is_empty());
    assert!(second.actions.is_empty());
}

#[test]
fn unknown_state_fields_survive_round_trip() {
    let parser = FreshserviceParser;
    let workflow = parser.parse(&fixture("freshservice/simple.json")).unwrap();
    assert_eq!(workflow.states["Open"].properties.get("sla_hours"), Some(&json!(4)));

    let output = parser.serialize(&workflow).unwrap();
    let value = output.as_structured().unwrap();
    assert_eq!(value["states"]["Open"]["sla_hours"], json!(4));
    assert_eq!(value["states"]["Open"]["is_initial"], json!(false));
    assert_eq!(value["states"]["New"]["is_initial"], json!(true));

    let reparsed = parser.parse(&output).unwrap();
    assert_eq!(reparsed.states.len(), workflow.states.len());
    assert_eq!(reparsed.transitions.len(), workflow.transitions.len());
}

#[test]
fn complex_round_trip_keeps_counts_and_action_order() {
    let parser = FreshserviceParser;
    let workflow = parser.parse(&fixture("freshservice/complex.json")).unwrap();
    assert_eq!(workflow.states.len(), 6);
    assert_eq!(workflow.transitions.len(), 7);

    let reparsed = parser.parse(&parser.serialize(&workflow).unwrap()).unwrap();
    assert_eq!(reparsed.states.len(), 6);
    assert_eq!(reparsed.transitions.len(), 7);

    let action_types: Vec<&str> = reparsed.transitions[4]
        .actions
        .iter()
        .map(|action| action.action_type.as_str())
        .collect();
    assert_eq!(action_types, vec!["set_field", "notify"]);
}

#[test]
fn missing_condition_and_action_fields_default() {
    let content = WorkflowContent::Structured(json!({
        "states": { "A": { "is_initial": true }, "B": {} },
        "transitions": [{
            "from_state": "A",
            "to_state": "B",
            "conditions": [{ "value": 3 }],
            "actions": [{}]
        }]
    }));

    let workflow = FreshserviceParser.parse(&content).unwrap();
    let transition = &workflow.transitions[0];
    assert_eq!(transition.conditions[0].field, "");
    assert_eq!(transition.conditions[0].operator, "");
    assert_eq!(transition.conditions[0].value, json!(3));
    assert_eq!(transition.actions[0].action_type, "");
    assert!(transition.actions[0].parameters.is_empty());
}

#[test]
fn missing_states_or_transitions_is_a_parse_error() {
    let no_states = WorkflowContent::Structured(json!({ "transitions": [] }));
    let err = FreshserviceParser.parse(&no_states).unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("'states'"));

    let no_transitions = WorkflowContent::Structured(json!({ "states": {} }));
    let err = FreshserviceParser.parse(&no_transitions).unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("'transitions'"));
}

#[test]
fn transition_without_endpoint_is_a_parse_error() {
    let content = WorkflowContent::Structured(json!({
        "states": { "A": {} },
        "transitions": [{ "from_state": "A" }]
    }));

    let err = FreshserviceParser.parse(&content).unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("to_state"));
}

#[test]
fn mistyped_field_is_a_parse_error() {
    let content = WorkflowContent::Structured(json!({
        "states": { "A": { "is_initial": "yes" } },
        "transitions": []
    }));

    let err = FreshserviceParser.parse(&content).unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("is_initial"));
}
