//! Command-line view of the survey catalog.
//!
//! Prints country lists, split schemes and band statistics as JSON so shell
//! pipelines and notebooks read the same values as the Rust loader. The
//! catalog comes from `SURVEY_CATALOG_PATH` when set, otherwise from the
//! compiled-in tables.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value};
use std::env;
use std::path::PathBuf;
use survey_catalog::{
    CatalogIndex, SchemeId, get_band_statistics, get_country_list, get_split_scheme,
    init_from_env,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    match parse_args()? {
        Command::Countries(family) => {
            init_from_env()?;
            print_json(&get_country_list(&family)?)
        }
        Command::Scheme(scheme) => {
            init_from_env()?;
            print_json(get_split_scheme(&scheme)?)
        }
        Command::Stats(variant) => {
            init_from_env()?;
            print_json(get_band_statistics(&variant)?)
        }
        Command::SplitOf { scheme, identifiers } => {
            let index = init_from_env()?;
            let scheme: SchemeId = scheme.parse()?;
            let mut out = Map::new();
            for identifier in identifiers {
                let split = index
                    .split_of(scheme, &identifier)
                    .map(|split| Value::String(split.to_string()))
                    .unwrap_or(Value::Null);
                out.insert(identifier, split);
            }
            print_json(&out)
        }
        Command::Export => {
            let index = init_from_env()?;
            print_json(index.catalog())
        }
        Command::Validate(path) => {
            let key = match path {
                Some(path) => CatalogIndex::load(&path)
                    .with_context(|| format!("validating {}", path.display()))?
                    .key()
                    .0
                    .clone(),
                None => init_from_env()?.key().0.clone(),
            };
            println!("ok: catalog '{key}' is valid");
            Ok(())
        }
        Command::Help => {
            print!("{}", usage());
            Ok(())
        }
    }
}

enum Command {
    Countries(String),
    Scheme(String),
    Stats(String),
    SplitOf {
        scheme: String,
        identifiers: Vec<String>,
    },
    Export,
    Validate(Option<PathBuf>),
    Help,
}

fn parse_args() -> Result<Command> {
    let mut args = env::args().skip(1);

    let Some(subcommand) = args.next() else {
        bail!(usage());
    };

    let command = match subcommand.as_str() {
        "countries" => Command::Countries(single_arg(&mut args, "countries <FAMILY>")?),
        "scheme" => Command::Scheme(single_arg(&mut args, "scheme <SCHEME>")?),
        "stats" => Command::Stats(single_arg(&mut args, "stats <VARIANT>")?),
        "split-of" => {
            let Some(scheme) = args.next() else {
                bail!("split-of expects a scheme and one or more identifiers");
            };
            let identifiers: Vec<String> = args.by_ref().flat_map(|arg| split_list(&arg)).collect();
            if identifiers.is_empty() {
                bail!("split-of expects a scheme and one or more identifiers");
            }
            Command::SplitOf {
                scheme,
                identifiers,
            }
        }
        "export" => Command::Export,
        "validate" => Command::Validate(args.next().map(PathBuf::from)),
        "--help" | "-h" => Command::Help,
        other => bail!("Unknown subcommand: {other}\n\n{}", usage()),
    };

    if args.next().is_some() {
        bail!("{subcommand}: unexpected extra arguments");
    }
    Ok(command)
}

fn single_arg(args: &mut impl Iterator<Item = String>, form: &str) -> Result<String> {
    match args.next() {
        Some(value) => Ok(value),
        None => bail!("usage: survey-catalog {form}"),
    }
}

fn usage() -> &'static str {
    "Usage: survey-catalog <command> [args]\n\nCommands:\n  countries <FAMILY>         Country list for DHS or LSMS.\n  scheme <SCHEME>            Split assignment for 3country or DHS_OOC_A/B/C.\n  stats <VARIANT>            Band means and std-devs for DHS or DHSNL.\n  split-of <SCHEME> <IDS>    Split of each identifier (comma or space separated).\n  export                     Print the active catalog as JSON.\n  validate [PATH]            Validate a catalog file (default: the active catalog).\n\nEnvironment:\n  SURVEY_CATALOG_PATH        JSON catalog replacing the compiled-in tables.\n  RUST_LOG                   Log filter (e.g. debug).\n"
}

/// Split a comma- or whitespace-delimited list of identifiers into tokens.
fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}
