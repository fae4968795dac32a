use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fontpack",
    version,
    about = "Resolve font pack references in stylesheets into literal font values"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rewrite stylesheets against a font pack config
    Run(RunArgs),
    /// Check a font pack config and report what it compiles to
    Validate(ValidateArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, short, env = "FONTPACK_CONFIG", default_value = "fontpack.yaml")]
    pub config: PathBuf,

    /// Fail rules that declare font properties without a font size
    #[arg(long)]
    pub require_size: bool,

    /// Write the result here instead of stdout (single input only)
    #[arg(long, short, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite each input file with its result
    #[arg(long)]
    pub in_place: bool,

    /// Stylesheets to process; `-` reads stdin
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, short, env = "FONTPACK_CONFIG", default_value = "fontpack.yaml")]
    pub config: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
