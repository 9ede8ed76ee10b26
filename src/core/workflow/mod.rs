//! Workflow transpilation: the unified model, the native format parsers, the
//! structural validator, and the orchestration between them.

pub mod formats;
pub mod schema;
pub mod transpiler;
pub mod validation;

pub use formats::{ContentKind, WorkflowContent, WorkflowFormat, WorkflowParser};
pub use schema::{Action, Condition, Properties, Transition, UnifiedWorkflow, WorkflowState};
pub use transpiler::{Transpiler, WorkflowTranspiler};
pub use validation::{validate_workflow, IssueSeverity, ValidationIssue, WorkflowValidator};
