use std::path::Path;

use anyhow::{anyhow, Context};
use colored::Colorize;
use serde_json::Value;
use strata_merge::traced_merge;
use strata_section::ReducerMap;
use strata_types::{Node, PatchCodec};

use crate::cli::*;
use crate::config::StoreConfig;
use crate::store::Store;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, cli.format),
        Command::Dispatch(args) => cmd_dispatch(args, cli.format),
        Command::Sections(args) => cmd_sections(args),
    }
}

fn cmd_merge(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let state = Node::from(read_json(&args.state)?);
    let patch = PatchCodec::new(args.absent_token)
        .decode(&read_json(&args.patch)?)
        .with_context(|| format!("decoding patch {}", args.patch.display()))?;

    let result = traced_merge(&state, &patch);
    print_node(&result, format)
}

fn cmd_dispatch(args: DispatchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = StoreConfig::load(&args.config)?;
    let sections = config.build_sections()?;

    let target = sections
        .iter()
        .find(|s| s.path().as_str() == args.section)
        .ok_or_else(|| anyhow!("section {:?} is not declared in {}", args.section, args.config.display()))?;

    let reducers = sections
        .iter()
        .try_fold(ReducerMap::new(), |acc, s| acc.merge(s.reducer_map()))?;

    let initial = args
        .state
        .as_deref()
        .map(read_json)
        .transpose()?
        .map(Node::from);
    let mut store = Store::new(reducers, initial);

    let change = config
        .codec()
        .decode(&read_json(&args.patch)?)
        .with_context(|| format!("decoding patch {}", args.patch.display()))?;
    let action = match args.action {
        ActionArg::Update => target.update_titled(change, &args.title),
        ActionArg::Replace => target.replace_titled(change, &args.title),
    };

    let changed = store.dispatch(&action);
    let status = if changed { "✓".green().bold() } else { "=".dimmed() };
    eprintln!("{} {}", status, action.action_type.yellow());

    print_node(store.state(), format)
}

fn cmd_sections(args: SectionsArgs) -> anyhow::Result<()> {
    let config = StoreConfig::load(&args.config)?;
    if config.sections.is_empty() {
        println!("No sections declared.");
        return Ok(());
    }
    for section in config.build_sections()? {
        println!(
            "{}  {}",
            section.path().as_str().bold(),
            section.default_value().to_string().dimmed()
        );
    }
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_node(node: &Node, format: OutputFormat) -> anyhow::Result<()> {
    let text = match format {
        OutputFormat::Text => serde_json::to_string_pretty(node)?,
        OutputFormat::Json => serde_json::to_string(node)?,
    };
    println!("{text}");
    Ok(())
}
