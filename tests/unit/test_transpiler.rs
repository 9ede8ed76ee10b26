use flowbridge::core::workflow::{
    Transpiler, WorkflowContent, WorkflowFormat, WorkflowParser, WorkflowTranspiler,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn no_initial_freshservice() -> WorkflowContent {
    WorkflowContent::Structured(json!({
        "states": { "New": {}, "Closed": { "is_terminal": true } },
        "transitions": [{ "from_state": "New", "to_state": "Closed" }]
    }))
}

#[test]
fn format_tokens_resolve_to_the_closed_set() {
    assert_eq!("fs".parse::<WorkflowFormat>().unwrap(), WorkflowFormat::Freshservice);
    assert_eq!(
        "freshservice".parse::<WorkflowFormat>().unwrap(),
        WorkflowFormat::Freshservice
    );
    assert_eq!("jsm".parse::<WorkflowFormat>().unwrap(), WorkflowFormat::Jsm);
    assert_eq!("mermaid".parse::<WorkflowFormat>().unwrap(), WorkflowFormat::Mermaid);

    let err = "Mermaid".parse::<WorkflowFormat>().unwrap_err();
    assert!(err.is_transpiler());
}

#[test]
fn unsupported_source_format_is_a_transpiler_error() {
    let err = WorkflowTranspiler::new()
        .transpile(&WorkflowContent::Text(String::new()), "invalid_format", "mermaid", true)
        .unwrap_err();

    assert!(err.is_transpiler());
    assert!(err.to_string().contains("Unsupported format"));
    assert!(err.to_string().contains("invalid_format"));
}

#[test]
fn validation_can_be_skipped() {
    let transpiler = WorkflowTranspiler::new();
    let content = no_initial_freshservice();

    let err = transpiler
        .transpile(&content, "freshservice", "mermaid", true)
        .unwrap_err();
    assert!(err.is_validation());

    let output = transpiler
        .transpile(&content, "freshservice", "mermaid", false)
        .unwrap();
    let text = output.as_text().expect("diagram text");
    assert!(text.starts_with("stateDiagram-v2"));
    assert!(text.contains("New --> Closed"));
}

#[test]
fn parse_errors_pass_through_unwrapped() {
    let err = WorkflowTranspiler::new()
        .transpile(
            &WorkflowContent::Structured(json!({ "states": {} })),
            "fs",
            "jsm",
            true,
        )
        .unwrap_err();

    assert!(err.is_parse());
    assert_eq!(
        err.to_string(),
        "Missing required field in Fresh Service workflow: 'transitions'"
    );
}

#[test]
fn same_format_transpile_preserves_counts() {
    let transpiler = WorkflowTranspiler::new();
    let content = WorkflowContent::Text(
        "stateDiagram-v2\n    [*] --> A\n    A --> B: go\n    B --> C\n    C --> [*]".to_string(),
    );

    let output = transpiler
        .transpile(&content, "mermaid", "mermaid", true)
        .unwrap();
    let reparsed = transpiler
        .parser(WorkflowFormat::Mermaid)
        .parse(&output)
        .unwrap();
    assert_eq!(reparsed.states.len(), 3);
    assert_eq!(reparsed.transitions.len(), 2);
}

#[test]
fn one_instance_serves_concurrent_calls() {
    let transpiler = Arc::new(WorkflowTranspiler::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let transpiler = Arc::clone(&transpiler);
            thread::spawn(move || {
                let diagram = format!(
                    "stateDiagram-v2\n    [*] --> S{i}\n    S{i} --> Done\n    Done --> [*]"
                );
                transpiler
                    .transpile(&WorkflowContent::Text(diagram), "mermaid", "jsm", true)
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.join().unwrap();
        let value = output.as_structured().unwrap();
        assert_eq!(value["statuses"][0]["name"], json!(format!("S{}", i)));
        assert_eq!(value["statuses"][0]["initial"], json!(true));
    }
}
