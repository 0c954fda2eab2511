//! Reference host: a small terminal front end driving the engine.

pub mod picker;
pub mod render;

use std::{fs, path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::{
    config::{ConfigError, ConfigManager, EngineConfig},
    core::{MementoStore, RelationIndex},
    domain::RelationRecord,
    errors::CascadeError,
    storage::JsonFileStore,
    utils::build_info,
};

const USAGE: &str = "\
usage: cascade_core_cli <command> [options]

commands:
  tree <records.json>                        print the branch/line/area tree
  select <records.json> [--store <file>] [--config <file>]
                                             pick (or reuse) a selection
  forget [--store <file>] [--config <file>]  erase the remembered selection
  version                                    print build information";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),
    #[error(transparent)]
    Engine(#[from] CascadeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid records file: {0}")]
    Records(#[from] serde_json::Error),
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tree {
        records: PathBuf,
    },
    Select {
        records: PathBuf,
        store: Option<PathBuf>,
        config: Option<PathBuf>,
    },
    Forget {
        store: Option<PathBuf>,
        config: Option<PathBuf>,
    },
    Version,
    Help,
}

/// Parses arguments (without the program name).
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(Command::Help);
    };
    let mut positional = Vec::new();
    let mut store = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => store = Some(flag_value(&mut args, "--store")?),
            "--config" => config = Some(flag_value(&mut args, "--config")?),
            flag if flag.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option `{flag}`")))
            }
            _ => positional.push(PathBuf::from(&arg)),
        }
    }

    let records = |positional: &mut Vec<PathBuf>| {
        if positional.len() == 1 {
            Ok(positional.remove(0))
        } else {
            Err(CliError::Usage(format!(
                "`{command}` expects exactly one records file"
            )))
        }
    };
    match command.as_str() {
        "tree" => Ok(Command::Tree {
            records: records(&mut positional)?,
        }),
        "select" => Ok(Command::Select {
            records: records(&mut positional)?,
            store,
            config,
        }),
        "forget" if positional.is_empty() => Ok(Command::Forget { store, config }),
        "forget" => Err(CliError::Usage(
            "`forget` takes no records file, only --store and --config".into(),
        )),
        "version" | "--version" => Ok(Command::Version),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(CliError::Usage(format!("unknown command `{other}`"))),
    }
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf, CliError> {
    args.next()
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Usage(format!("`{flag}` needs a value")))
}

pub fn run_cli<I>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    match parse_args(args)? {
        Command::Tree { records } => {
            let index = RelationIndex::build(&load_records(&records)?);
            print!("{}", render::render_tree(&index));
            Ok(())
        }
        Command::Select {
            records,
            store,
            config,
        } => {
            let config = load_config(config)?;
            let index = Arc::new(RelationIndex::build(&load_records(&records)?));
            let mut mementos = MementoStore::new(open_store(store)?, config.storage_keys.clone());
            picker::run_select(index, &mut mementos)
        }
        Command::Forget { store, config } => {
            let config = load_config(config)?;
            let mut mementos = MementoStore::new(open_store(store)?, config.storage_keys);
            mementos.clear()?;
            println!("{}", render::notice("Remembered selection cleared."));
            Ok(())
        }
        Command::Version => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    }
}

pub fn load_records(path: &std::path::Path) -> Result<Vec<RelationRecord>, CliError> {
    let data = fs::read_to_string(path)?;
    let records: Vec<RelationRecord> = serde_json::from_str(&data)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded relation records");
    Ok(records)
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig, CliError> {
    let manager = match path {
        Some(path) => ConfigManager::new(path),
        None => ConfigManager::default_location()?,
    };
    Ok(manager.load()?)
}

fn open_store(path: Option<PathBuf>) -> Result<JsonFileStore, CliError> {
    let store = match path {
        Some(path) => JsonFileStore::open(path)?,
        None => JsonFileStore::open_default()?,
    };
    Ok(store)
}
