//! Command-line definition for `bl`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Store reusable snippets and stacks, then add them to any project.
///
/// Snippets are single files, stacks are whole directories described by a
/// `boiler.stack.json`. Every stored resource is versioned as `name@N`.
#[derive(Parser, Debug)]
#[command(name = "bl", version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use this configuration file instead of ~/.boiler/boiler.conf.json
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a file as a snippet or a directory as a stack
    Store {
        /// File or directory to store (defaults to the current directory)
        path: Option<PathBuf>,
        /// Base name to store under
        #[arg(short, long)]
        name: Option<String>,
        /// Store a file as a snippet
        #[arg(long, conflicts_with = "stack")]
        snippet: bool,
        /// Store a directory as a stack
        #[arg(long)]
        stack: bool,
    },

    /// Add a stored snippet or stack to a project
    Add {
        /// Resource name: name, name@version, name.ext or name@version.ext
        resource: String,
        /// Destination directory (defaults to the current directory)
        #[arg(short, long, value_name = "DIR")]
        to: Option<PathBuf>,
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Remove stored resources
    Clean {
        /// Resource to remove
        #[arg(required_unless_present_any = ["all", "snippets", "stacks"])]
        resource: Option<String>,
        /// Remove every snippet and stack
        #[arg(long, conflicts_with_all = ["resource", "snippets", "stacks"])]
        all: bool,
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// List stored resources
    #[command(alias = "list")]
    Ls {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Search stored resources by name
    Search {
        query: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Show details about a stored resource
    Info { resource: String },

    /// Create a boiler.stack.json or a snippet scaffold
    Init {
        /// Create a snippet file instead of a stack configuration
        #[arg(short = 'n', long)]
        snippet: bool,
        /// Snippet file name, e.g. handler.js or Dockerfile
        #[arg(short, long, value_name = "NAME")]
        file: Option<String>,
        /// Skip prompts and use defaults
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the store locations
    Path,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ScopeArgs {
    /// Only snippets
    #[arg(long, conflicts_with = "stacks")]
    pub snippets: bool,
    /// Only stacks
    #[arg(long)]
    pub stacks: bool,
}
