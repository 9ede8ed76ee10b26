use crate::core::error::{Result, WorkflowError};
use crate::core::workflow::schema::UnifiedWorkflow;
use serde::Serialize;
use std::fmt;

pub mod rules;
pub use rules::*;

/// Diagnostic severity levels emitted by validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl IssueSeverity {
    fn rank(&self) -> u8 {
        match self {
            IssueSeverity::Error => 2,
            IssueSeverity::Warning => 1,
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "Error"),
            IssueSeverity::Warning => write!(f, "Warning"),
        }
    }
}

/// Individual finding emitted by a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    pub severity: IssueSeverity,
    pub message: String,
    pub location: Option<String>,
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        code: impl Into<String>,
        severity: IssueSeverity,
        message: impl Into<String>,
        location: Option<String>,
        suggestion: Option<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            location,
            suggestion,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {})", location)?;
        }
        Ok(())
    }
}

/// Trait implemented by workflow validation rules.
///
/// Rules report findings in scan order; the first Error-severity finding of the
/// first failing rule is what [`WorkflowValidator::validate_workflow`] raises.
pub trait ValidationRule: Send + Sync {
    fn check(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue>;
}

/// Runs the structural checks over a unified workflow.
///
/// Validation is a pure function of the model and does not depend on the
/// format the workflow came from or is headed to.
pub struct WorkflowValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl WorkflowValidator {
    /// Construct a validator populated with the built-in rules, in reporting order.
    pub fn new() -> Self {
        Self {
            rules: built_in_rules(),
        }
    }

    /// Fail on the first violated rule, checked in registration order.
    pub fn validate_workflow(&self, workflow: &UnifiedWorkflow) -> Result<()> {
        for rule in &self.rules {
            if let Some(issue) = rule.check(workflow).into_iter().find(ValidationIssue::is_error) {
                tracing::debug!(code = %issue.code, "workflow failed validation");
                return Err(WorkflowError::Validation(issue.message));
            }
        }
        Ok(())
    }

    /// Run every rule and return all findings.
    /// The results are sorted by `(severity desc, code asc, location asc)`.
    pub fn diagnose(&self, workflow: &UnifiedWorkflow) -> Vec<ValidationIssue> {
        let mut issues: Vec<ValidationIssue> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(workflow))
            .collect();
        issues.sort_by(|a, b| {
            b.severity
                .rank()
                .cmp(&a.severity.rank())
                .then(a.code.cmp(&b.code))
                .then(a.location.cmp(&b.location))
        });
        issues
    }
}

impl Default for WorkflowValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with the built-in rules.
pub fn validate_workflow(workflow: &UnifiedWorkflow) -> Result<()> {
    WorkflowValidator::new().validate_workflow(workflow)
}
