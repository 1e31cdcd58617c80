//! `blockconf` command line tool
//!
//! Checks, normalizes and queries blockconf files. Logging goes to stderr and
//! is controlled by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use blockconf::{BlockPolicy, Node, ParserConfig, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

fn cli() -> Command {
    let file = Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Configuration file (.gz and .zst files are decompressed)");

    Command::new("blockconf")
        .version(blockconf::VERSION)
        .about("Inspect brace-delimited configuration files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Close blocks left open at end of input and stop at a stray '}'"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .global(true)
                .value_parser(max_depth_arg)
                .help("Maximum block nesting depth, 1 to 1024 [default: 128]"),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a file and report its top-level shape")
                .arg(file.clone()),
        )
        .subcommand(
            Command::new("print")
                .about("Re-emit a file in normalized form")
                .arg(file.clone())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write to this file instead of stdout (.gz and .zst compress)"),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Print every value of a key")
                .arg(file.clone())
                .arg(Arg::new("key").required(true).help("Value key"))
                .arg(
                    Arg::new("block")
                        .long("block")
                        .short('b')
                        .help("Dotted path of unique blocks to descend into, e.g. tree.trunk"),
                ),
        )
        .subcommand(
            Command::new("json")
                .about("Dump the parsed tree as JSON")
                .arg(file),
        )
}

fn max_depth_arg(raw: &str) -> Result<usize, String> {
    let depth: usize = raw.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_DEPTH_CEILING).contains(&depth) {
        Ok(depth)
    } else {
        Err(format!("must be between 1 and {MAX_DEPTH_CEILING}"))
    }
}

fn init_logging() {
    Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn parser_config(matches: &ArgMatches) -> ParserConfig {
    let blocks = if matches.get_flag("lenient") {
        BlockPolicy::Lenient
    } else {
        BlockPolicy::Strict
    };
    let max_depth = matches
        .get_one::<usize>("max-depth")
        .copied()
        .unwrap_or(DEFAULT_MAX_DEPTH);

    ParserConfig::new()
        .with_blocks(blocks)
        .with_max_depth(max_depth)
}

fn load(args: &ArgMatches) -> Result<Node> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing file argument")?;
    Node::from_path_with(path, parser_config(args))
        .with_context(|| format!("failed to load {}", path.display()))
}

fn check(args: &ArgMatches) -> Result<()> {
    let root = load(args)?;
    let values: usize = root.values().map(|(_, v)| v.len()).sum();
    let blocks = root.children().count();
    println!("ok: {values} values, {blocks} blocks");
    Ok(())
}

fn print(args: &ArgMatches) -> Result<()> {
    let root = load(args)?;

    match args.get_one::<PathBuf>("output") {
        Some(out) => {
            let mut sink = blockconf::source::create(out)?;
            root.write_to(&mut sink)
                .with_context(|| format!("failed to write {}", out.display()))?;
            sink.finish()?;
            tracing::info!(path = %out.display(), "written");
        }
        None => root.write_to(std::io::stdout().lock())?,
    }
    Ok(())
}

fn get(args: &ArgMatches) -> Result<()> {
    let root = load(args)?;
    let key = args.get_one::<String>("key").context("missing key argument")?;

    let block = match args.get_one::<String>("block") {
        Some(path) => {
            let segments: Vec<&str> = path.split('.').collect();
            root.get_path(&segments[..])
                .with_context(|| format!("no unique block at {path}"))?
        }
        None => &root,
    };

    let mut stdout = std::io::stdout().lock();
    for value in block.get_values::<String>(key)? {
        writeln!(stdout, "{value}")?;
    }
    Ok(())
}

fn json(args: &ArgMatches) -> Result<()> {
    let root = load(args)?;
    println!("{}", serde_json::to_string_pretty(&root)?);
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("check", args)) => check(args),
        Some(("print", args)) => print(args),
        Some(("get", args)) => get(args),
        Some(("json", args)) => json(args),
        _ => unreachable!("subcommand_required"),
    }
}
