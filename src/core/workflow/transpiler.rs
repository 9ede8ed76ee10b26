use crate::core::error::{Result, WorkflowError};
use crate::core::workflow::formats::{
    FreshserviceParser, JsmParser, MermaidParser, WorkflowContent, WorkflowFormat, WorkflowParser,
};
use crate::core::workflow::schema::UnifiedWorkflow;
use crate::core::workflow::validation::WorkflowValidator;

/// Capability set of a workflow transpiler.
pub trait Transpiler {
    /// Fail with a validation error if the workflow breaks a structural rule.
    fn validate(&self, workflow: &UnifiedWorkflow) -> Result<()>;

    /// Convert `content` from one format key to another.
    fn transpile(
        &self,
        content: &WorkflowContent,
        from_format: &str,
        to_format: &str,
        validate: bool,
    ) -> Result<WorkflowContent>;
}

/// Converts workflows between formats through the unified model.
///
/// The parser table is fixed at construction and parsers carry no per-call
/// state, so one instance can serve concurrent calls.
pub struct WorkflowTranspiler {
    validator: WorkflowValidator,
    parsers: [Box<dyn WorkflowParser>; 3],
}

impl WorkflowTranspiler {
    pub fn new() -> Self {
        let parsers: [Box<dyn WorkflowParser>; 3] = [
            Box::new(FreshserviceParser),
            Box::new(JsmParser),
            Box::new(MermaidParser),
        ];
        debug_assert!(WorkflowFormat::ALL
            .iter()
            .all(|format| parsers[format.index()].format() == *format));
        Self {
            validator: WorkflowValidator::new(),
            parsers,
        }
    }

    pub fn parser(&self, format: WorkflowFormat) -> &dyn WorkflowParser {
        self.parsers[format.index()].as_ref()
    }

    pub fn validator(&self) -> &WorkflowValidator {
        &self.validator
    }

    /// Parse `content` with the parser registered for `format`.
    pub fn parse(&self, content: &WorkflowContent, format: WorkflowFormat) -> Result<UnifiedWorkflow> {
        if content.kind() != format.content_kind() {
            return Err(WorkflowError::transpiler(format!(
                "Error during transpilation: {} expects {} content, got {}",
                format,
                format.content_kind(),
                content.kind()
            )));
        }
        self.parser(format).parse(content).map_err(classify)
    }

    /// Typed variant of [`Transpiler::transpile`] for callers holding resolved formats.
    pub fn transpile_formats(
        &self,
        content: &WorkflowContent,
        from_format: WorkflowFormat,
        to_format: WorkflowFormat,
        validate: bool,
    ) -> Result<WorkflowContent> {
        let span = tracing::debug_span!("transpile", from = %from_format, to = %to_format);
        let _entered = span.enter();

        let workflow = self.parse(content, from_format)?;
        if validate {
            self.validate(&workflow)?;
        }
        let output = self
            .parser(to_format)
            .serialize(&workflow)
            .map_err(classify)?;

        tracing::info!(
            from = %from_format,
            to = %to_format,
            states = workflow.states.len(),
            transitions = workflow.transitions.len(),
            validated = validate,
            "transpiled workflow"
        );
        Ok(output)
    }
}

impl Default for WorkflowTranspiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Transpiler for WorkflowTranspiler {
    fn validate(&self, workflow: &UnifiedWorkflow) -> Result<()> {
        self.validator.validate_workflow(workflow)
    }

    fn transpile(
        &self,
        content: &WorkflowContent,
        from_format: &str,
        to_format: &str,
        validate: bool,
    ) -> Result<WorkflowContent> {
        // Both keys resolve before any parsing starts.
        let from_format: WorkflowFormat = from_format.parse()?;
        let to_format: WorkflowFormat = to_format.parse()?;
        self.transpile_formats(content, from_format, to_format, validate)
    }
}

/// Parse and validation failures pass through untouched; anything else becomes
/// a transpiler error.
fn classify(error: WorkflowError) -> WorkflowError {
    match error {
        WorkflowError::Parse(_) | WorkflowError::Validation(_) => error,
        WorkflowError::Transpiler(message) => {
            WorkflowError::Transpiler(format!("Error during transpilation: {}", message))
        }
    }
}
