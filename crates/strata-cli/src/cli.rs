use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strata_types::DEFAULT_ABSENT_TOKEN;

#[derive(Parser)]
#[command(
    name = "strata",
    about = "strata: traced merges and state sections over JSON",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Text,
    /// Compact JSON on one line
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a patch file to a state file with a traced merge
    Merge(MergeArgs),
    /// Dispatch an update or replace action to a configured section
    Dispatch(DispatchArgs),
    /// List the sections declared in a config file
    Sections(SectionsArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// JSON file holding the current state
    pub state: PathBuf,
    /// JSON file holding the patch
    pub patch: PathBuf,
    /// String that marks a key for removal in the patch
    #[arg(long, default_value = DEFAULT_ABSENT_TOKEN)]
    pub absent_token: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ActionArg {
    Update,
    Replace,
}

#[derive(Args)]
pub struct DispatchArgs {
    /// TOML file declaring the sections
    #[arg(long)]
    pub config: PathBuf,
    /// JSON file with the current global state; defaults are used when omitted
    #[arg(long)]
    pub state: Option<PathBuf>,
    /// Path of the target section
    #[arg(long)]
    pub section: String,
    #[arg(long, value_enum, default_value = "update")]
    pub action: ActionArg,
    /// Human-readable title for the action type
    #[arg(long, default_value = "")]
    pub title: String,
    /// JSON file holding the change
    pub patch: PathBuf,
}

#[derive(Args)]
pub struct SectionsArgs {
    #[arg(long)]
    pub config: PathBuf,
}
