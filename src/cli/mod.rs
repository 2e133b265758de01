//! CLI module for pyhover
//!
//! Provides command-line interface using clap derive macros.

pub mod commands;
pub mod location;
pub mod output;
pub mod response;

pub use location::{ParsedLocation, SourceInput};
pub use output::OutputContext;

use clap::{Parser, Subcommand};

use commands::{
    batch::BatchArgs, config::ConfigArgs, locate::LocateArgs, resolve::ResolveArgs,
    snapshot::SnapshotArgs, version::VersionArgs,
};

const LONG_ABOUT: &str = r#"
pyhover - Python hover intelligence for editors

Answers "what is under the cursor, and what does it mean" for Python code.
Every command prints a single JSON document on stdout.

LOCATE EXAMPLES:
  pyhover locate app.py --line 10 --column 4      # {"type": "list"}
  pyhover locate app.py:10:4
  cat app.py | pyhover locate - -l 3 -c 8         # {"type": "Outer.method"}

RESOLVE EXAMPLES:
  pyhover resolve os.path.join
  pyhover resolve list.append
  pyhover resolve lambda

THIRD-PARTY PACKAGES:
  pyhover snapshot --python .venv/bin/python requests -o .pyhover/requests.json
  # then add "requests.json" to registry.snapshots in .pyhover/config.toml

SESSION MODE:
  pyhover batch < requests.jsonl
    {"command": "locate", "source": "x = [1]", "line": 1, "column": 4}
    {"command": "resolve", "path": "json.dumps"}
"#;

/// pyhover - Python hover intelligence for editors
#[derive(Parser, Debug)]
#[command(name = "pyhover")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
#[command(after_help = "Use 'pyhover <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Single-line JSON output
    #[arg(long, global = true)]
    pub compact: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify the construct at a cursor position
    Locate(LocateArgs),

    /// Resolve a dotted path to documentation metadata
    Resolve(ResolveArgs),

    /// Show the Python version the registry describes
    Version(VersionArgs),

    /// Read JSON requests from stdin, one per line
    Batch(BatchArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Record modules from a Python interpreter as a registry snapshot
    Snapshot(SnapshotArgs),
}
