use crate::{
    cli::args::{ConvertArgs, ReportFormat, ValidateArgs},
    core::{
        config::FlowbridgeConfig,
        workflow::{
            ContentKind, IssueSeverity, ValidationIssue, WorkflowContent, WorkflowFormat,
            WorkflowTranspiler,
        },
    },
    Result,
};
use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn convert(args: ConvertArgs, config: &FlowbridgeConfig) -> Result<()> {
    let from = WorkflowFormat::from(args.from);
    let to = WorkflowFormat::from(args.to);
    let validate = config.transpile.validate && !args.no_validate;
    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        %from,
        %to,
        validate,
        "converting workflow"
    );

    let content = read_content(&args.input, from)?;
    let transpiler = WorkflowTranspiler::new();
    let converted = transpiler
        .transpile_formats(&content, from, to, validate)
        .with_context(|| format!("failed to convert {}", args.input.display()))?;
    write_content(&args.output, &converted, config.output.pretty)?;

    println!(
        "Converted {} ({}) -> {} ({})",
        args.input.display(),
        from.short_token(),
        args.output.display(),
        to.short_token()
    );
    Ok(())
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    input: String,
    format: &'static str,
    valid: bool,
    errors: usize,
    warnings: usize,
    issues: &'a [ValidationIssue],
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    let format = WorkflowFormat::from(args.from);
    let content = read_content(&args.input, format)?;
    let transpiler = WorkflowTranspiler::new();
    let workflow = transpiler
        .parse(&content, format)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let issues = transpiler.validator().diagnose(&workflow);

    let errors = issues.iter().filter(|issue| issue.is_error()).count();
    let warnings = issues
        .iter()
        .filter(|issue| issue.severity == IssueSeverity::Warning)
        .count();

    match args.format {
        ReportFormat::Text => {
            for issue in &issues {
                println!("{}", issue);
                if let Some(suggestion) = &issue.suggestion {
                    println!("  suggestion: {}", suggestion);
                }
            }
            println!(
                "{}: {} error(s), {} warning(s)",
                args.input.display(),
                errors,
                warnings
            );
        }
        ReportFormat::Json => {
            let report = ValidationReport {
                input: args.input.display().to_string(),
                format: format.as_str(),
                valid: errors == 0,
                errors,
                warnings,
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if errors > 0 {
        return Err(anyhow!(
            "{} failed validation with {} error(s)",
            args.input.display(),
            errors
        ));
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Read `path` into the content shape `format` expects.
pub fn read_content(path: &Path, format: WorkflowFormat) -> Result<WorkflowContent> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    match format.content_kind() {
        ContentKind::Text => Ok(WorkflowContent::Text(raw)),
        ContentKind::Structured if is_yaml(path) => {
            let value: Value = serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to decode YAML from {}", path.display()))?;
            Ok(WorkflowContent::Structured(value))
        }
        ContentKind::Structured => {
            let value: Value = serde_json::from_str(&raw)
                .with_context(|| format!("failed to decode JSON from {}", path.display()))?;
            Ok(WorkflowContent::Structured(value))
        }
    }
}

/// Write converted content; structured payloads honour the path's extension.
pub fn write_content(path: &Path, content: &WorkflowContent, pretty: bool) -> Result<()> {
    let mut rendered = match content {
        WorkflowContent::Text(text) => text.clone(),
        WorkflowContent::Structured(value) if is_yaml(path) => serde_yaml::to_string(value)?,
        WorkflowContent::Structured(value) if pretty => serde_json::to_string_pretty(value)?,
        WorkflowContent::Structured(value) => serde_json::to_string(value)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
