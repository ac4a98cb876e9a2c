//! stringz CLI
//!
//! Usage:
//!   stringz [OPTIONS] --bundle <NAME> <COMMAND>
//!
//! Commands:
//!   get <KEY>...       Resolve keys and print their values
//!   check <MAPPING>    Resolve and validate every request of a mapping file
//!   keys               Print every key of the bundle with its resolved value

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stringz::{
    BundleNode, DirectoryLoader, Engine, EngineConfig, Error, MessageMap, Signature,
};

#[derive(Parser)]
#[command(name = "stringz")]
#[command(about = "Resolve resource bundle templates and validate format strings")]
struct Cli {
    /// Directory containing bundle files (TOML format)
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Bundle base name; dots map to subdirectories
    #[arg(short, long)]
    bundle: String,

    /// Locale suffix of the bundle file; empty selects the root bundle
    #[arg(short, long, default_value = "")]
    locale: String,

    /// Engine configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve keys and print their values
    Get {
        /// Keys to resolve
        #[arg(required = true)]
        keys: Vec<String>,

        /// Expected conversions, e.g. "s,d"
        #[arg(short, long)]
        expect: Option<Signature>,
    },

    /// Resolve and validate every request of a mapping file
    Check {
        /// Mapping file with a [requests] table (TOML format)
        mapping: PathBuf,
    },

    /// Print every key of the bundle with its resolved value
    Keys,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading configuration '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let engine = Engine::with_config(DirectoryLoader::new(cli.dir.clone()), config);
    let node = match engine.bundle(&cli.bundle, &cli.locale) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let failures = match &cli.command {
        Command::Get { keys, expect } => run_get(&engine, &node, keys, expect.as_ref()),
        Command::Check { mapping } => run_check(&engine, &node, mapping),
        Command::Keys => run_keys(&engine, &node),
    };

    if failures > 0 {
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_get(
    engine: &Engine<DirectoryLoader>,
    node: &BundleNode,
    keys: &[String],
    expect: Option<&Signature>,
) -> usize {
    let mut failures = 0;
    for key in keys {
        let result = match expect {
            Some(expected) => engine.resolver().resolve_validated(node, key, expected),
            None => engine.resolver().resolve(node, key).map_err(Error::from),
        };
        match result {
            Ok(value) => println!("{}", value),
            Err(e) => {
                eprintln!("{}", e.report());
                failures += 1;
            }
        }
    }
    failures
}

fn run_check(engine: &Engine<DirectoryLoader>, node: &BundleNode, mapping: &Path) -> usize {
    let map = match MessageMap::from_file(mapping) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error loading mapping '{}': {}", mapping.display(), e);
            return 1;
        }
    };

    let failures = map.check(engine.resolver(), node);
    for (name, e) in &failures {
        eprintln!("[{}] {}", name, e.report());
    }
    println!(
        "checked {} request(s), {} failure(s)",
        map.requests.len(),
        failures.len()
    );
    failures.len()
}

fn run_keys(engine: &Engine<DirectoryLoader>, node: &BundleNode) -> usize {
    let mut keys: Vec<&str> = node.dictionary().keys().collect();
    keys.sort_unstable();

    let mut failures = 0;
    for key in keys {
        match engine.resolver().resolve(node, key) {
            Ok(value) => println!("{} = {}", key, value),
            Err(e) => {
                eprintln!("{}: {}", key, e);
                failures += 1;
            }
        }
    }
    failures
}
