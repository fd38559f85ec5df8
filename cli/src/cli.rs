use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use twitterverse_core::{EvalOptions, UnknownOperationPolicy};

#[derive(Parser, Debug)]
#[clap(name = "twitterverse")]
#[clap(about = "Query a social graph of user profiles", long_about = None)]
pub struct Cli {
    /// Log pipeline stages at debug level (RUST_LOG takes precedence)
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Where the profile file comes from.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Profile file to load
    #[clap(long, env = "TWITTERVERSE_DATA")]
    pub data: PathBuf,
}

/// How queries are evaluated.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// What to do with unrecognised search operations: ignore or reject
    #[clap(long, env = "TWITTERVERSE_UNKNOWN_OPS", default_value = "ignore")]
    pub unknown_ops: UnknownOperationPolicy,
}

impl EvalArgs {
    pub fn options(&self) -> EvalOptions {
        EvalOptions {
            unknown_operations: self.unknown_ops,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate query files against the profile file, printing each result
    Query {
        #[clap(flatten)]
        data: DataArgs,

        #[clap(flatten)]
        eval: EvalArgs,

        /// Query files, evaluated in order
        #[clap(required = true)]
        queries: Vec<PathBuf>,
    },

    /// Read query file names from stdin until an empty line
    Interactive {
        #[clap(flatten)]
        data: DataArgs,

        #[clap(flatten)]
        eval: EvalArgs,
    },

    /// List the followers of a user
    Followers {
        #[clap(flatten)]
        data: DataArgs,

        username: String,
    },

    /// Summarise the loaded profile file
    Status {
        #[clap(flatten)]
        data: DataArgs,
    },

    /// Print the parsed profile table as JSON
    Dump {
        #[clap(flatten)]
        data: DataArgs,
    },
}
