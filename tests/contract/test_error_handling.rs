use flowbridge::core::error::{ErrorKind, WorkflowError};
use flowbridge::core::workflow::{Transpiler, WorkflowContent, WorkflowTranspiler};
use serde_json::json;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_flat() {
        assert_eq!(WorkflowError::parse("x").kind(), ErrorKind::Parse);
        assert_eq!(WorkflowError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(WorkflowError::transpiler("x").kind(), ErrorKind::Transpiler);
    }

    #[test]
    fn test_error_display_is_the_message() {
        let error = WorkflowError::validation("Workflow must have an initial state");
        assert_eq!(error.to_string(), "Workflow must have an initial state");
        assert_eq!(error.message(), "Workflow must have an initial state");
        assert_eq!(error.kind().to_string(), "ValidationError");
    }

    #[test]
    fn test_errors_convert_into_anyhow() {
        fn fails() -> anyhow::Result<()> {
            let error = WorkflowError::parse("Invalid transition line 3: A --> B --> C");
            Err(error.into())
        }

        let err = fails().unwrap_err();
        let inner = err.downcast_ref::<WorkflowError>().expect("workflow error");
        assert!(inner.is_parse());
    }

    #[test]
    fn test_malformed_diagram_surfaces_parse_error() {
        let err = WorkflowTranspiler::new()
            .transpile(
                &WorkflowContent::Text("stateDiagram-v2\nA --> B --> C".into()),
                "mermaid",
                "fs",
                false,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.message().contains("A --> B --> C"));
    }

    #[test]
    fn test_wrong_content_shape_is_transpiler_error() {
        let err = WorkflowTranspiler::new()
            .transpile(
                &WorkflowContent::Structured(json!({ "statuses": [] })),
                "mermaid",
                "jsm",
                true,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transpiler);
        assert!(err.message().starts_with("Error during transpilation"));
    }

    #[test]
    fn test_unsupported_target_checked_before_parsing() {
        let err = WorkflowTranspiler::new()
            .transpile(
                &WorkflowContent::Structured(json!({})),
                "fs",
                "bpmn",
                true,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transpiler);
        assert_eq!(err.message(), "Unsupported format type: 'bpmn'");
    }
}
