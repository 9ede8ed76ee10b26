use crate::core::workflow::WorkflowFormat;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// Workflow file to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination file for the converted workflow
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Format of the input file
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub from: FormatArg,

    /// Format to convert into
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub to: FormatArg,

    /// Skip structural validation between parse and serialize
    #[arg(long)]
    pub no_validate: bool,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Workflow file to check
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Format of the input file
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub from: FormatArg,

    /// Output format for diagnostics
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, clap::ValueEnum, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// Service-desk JSON (`states` + `transitions`)
    #[value(name = "fs", alias = "freshservice")]
    Freshservice,
    /// Issue-tracker JSON (`statuses` + `rules`)
    Jsm,
    /// stateDiagram-v2 text
    Mermaid,
}

impl From<FormatArg> for WorkflowFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Freshservice => WorkflowFormat::Freshservice,
            FormatArg::Jsm => WorkflowFormat::Jsm,
            FormatArg::Mermaid => WorkflowFormat::Mermaid,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable diagnostics, one per line
    Text,
    /// JSON payload suitable for downstream tooling
    Json,
}
