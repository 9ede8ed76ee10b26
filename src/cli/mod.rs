pub mod args;
pub mod commands;

pub use args::{ConvertArgs, FormatArg, ReportFormat, ValidateArgs};
use crate::core::config::FlowbridgeConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
WORKFLOW COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "flowbridge")]
#[command(version = crate::VERSION)]
#[command(about = "Convert workflow definitions between Freshservice, JSM and Mermaid")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Every conversion goes through one unified model, so any source format can target any other."
)]
pub struct Args {
    /// Path to config file (default: ./flowbridge.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Convert a workflow file into another format",
        long_about = "Convert parses the input, validates the unified workflow unless disabled, and writes it in the target format.",
        after_help = "Example:\n    flowbridge convert ticket.json ticket.mmd --from fs --to mermaid"
    )]
    Convert(ConvertArgs),
    #[command(
        about = "Report structural problems in a workflow file",
        long_about = "Validate runs every structural rule and prints all findings. Exits non-zero when any error is found.",
        after_help = "Example:\n    flowbridge validate board.json --from jsm --format json"
    )]
    Validate(ValidateArgs),
}

pub fn run(command: Command, config: &FlowbridgeConfig) -> crate::Result<()> {
    match command {
        Command::Convert(convert_args) => commands::convert(convert_args, config),
        Command::Validate(validate_args) => commands::validate(validate_args),
    }
}
