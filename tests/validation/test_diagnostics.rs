use flowbridge::core::workflow::formats::FreshserviceParser;
use flowbridge::core::workflow::{
    Condition, IssueSeverity, Transition, UnifiedWorkflow, WorkflowContent, WorkflowParser,
    WorkflowState, WorkflowValidator,
};
use insta::assert_snapshot;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn severity_rank(severity: IssueSeverity) -> u8 {
    match severity {
        IssueSeverity::Error => 2,
        IssueSeverity::Warning => 1,
    }
}

fn broken_workflow() -> UnifiedWorkflow {
    UnifiedWorkflow::new("freshservice")
        .with_state(WorkflowState::new("A").initial())
        .with_state(WorkflowState::new("B"))
        .with_state(WorkflowState::new("C").terminal())
        .with_state(WorkflowState::new("D"))
        .with_transition(
            Transition::new("A", "B")
                .with_condition(Condition::new("x", "equals", json!(1)))
                .with_condition(Condition::new("x", "equals", json!(2))),
        )
        .with_transition(Transition::new("B", "Ghost"))
        .with_transition(Transition::new("C", "A"))
}

#[test]
fn diagnostics_are_stably_sorted() {
    let issues = WorkflowValidator::new().diagnose(&broken_workflow());
    assert!(!issues.is_empty());
    for pair in issues.windows(2) {
        let left = &pair[0];
        let right = &pair[1];
        let left_rank = severity_rank(left.severity);
        let right_rank = severity_rank(right.severity);
        assert!(
            left_rank >= right_rank,
            "severity sort order must be descending"
        );
        if left_rank == right_rank {
            assert!(
                left.code <= right.code,
                "code sort order must be ascending when severities match"
            );
        }
    }

    assert_snapshot!(
        serde_json::to_string_pretty(&issues).expect("serialize diagnostics"),
        @r###"
    [
      {
        "code": "WF-VAL-004",
        "severity": "error",
        "message": "Invalid to_state in transition: Ghost",
        "location": "B -> Ghost",
        "suggestion": "point transitions at declared states"
      },
      {
        "code": "WF-VAL-005",
        "severity": "error",
        "message": "Following states are unreachable: C, D",
        "location": null,
        "suggestion": "connect the states from a reachable transition or remove them"
      },
      {
        "code": "WF-VAL-006",
        "severity": "error",
        "message": "Terminal state C cannot have outgoing transitions",
        "location": "C -> A",
        "suggestion": "remove the transition or clear the terminal flag"
      },
      {
        "code": "WF-VAL-007",
        "severity": "error",
        "message": "Conflicting conditions for x in transition A -> B",
        "location": "A -> B",
        "suggestion": "merge conditions that share a field and operator"
      },
      {
        "code": "WF-VAL-008",
        "severity": "warning",
        "message": "state 'D' has no outgoing transitions and is not terminal",
        "location": "D",
        "suggestion": "flag the state as terminal or add a transition out of it"
      }
    ]
    "###
    );
}

#[test]
fn first_failing_rule_matches_first_error_in_rule_order() {
    let validator = WorkflowValidator::new();
    let err = validator.validate_workflow(&broken_workflow()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid to_state in transition: Ghost");
}

#[test]
fn valid_fixture_has_no_diagnostics() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("freshservice")
        .join("complex.json");
    let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let workflow = FreshserviceParser
        .parse(&WorkflowContent::Structured(value))
        .unwrap();

    assert!(WorkflowValidator::new().diagnose(&workflow).is_empty());
}

#[test]
fn issue_display_includes_code_and_location() {
    let issues = WorkflowValidator::new().diagnose(&broken_workflow());
    let last = issues.last().unwrap();
    assert_eq!(
        last.to_string(),
        "Warning [WF-VAL-008] state 'D' has no outgoing transitions and is not terminal (at D)"
    );
}
