pub mod config;
pub mod error;
pub mod workflow;

pub use config::{ConfigLoader, ConfigValidator, FlowbridgeConfig};
pub use error::{ErrorKind, WorkflowError};
pub use workflow::{
    validate_workflow, Transpiler, UnifiedWorkflow, WorkflowContent, WorkflowFormat,
    WorkflowTranspiler,
};
