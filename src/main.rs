use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use conflint::commands;
use conflint::commands::callback::CallbackOptions;
use conflint::commands::validate::ValidateOptions;

#[derive(Parser)]
#[command(name = "conflint", version, about = "Config repo validator")]
struct Cli {
    /// Run as if conflint was started in <dir> instead of the current directory
    #[arg(short = 'C', global = true, value_name = "dir")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every config file in the repo
    Validate {
        /// String that must not appear in values of the checked environment; repeatable
        #[arg(long = "forbid", value_name = "string")]
        forbid: Vec<String>,
        /// Environment directory whose values are scanned for forbidden strings
        #[arg(long, value_name = "dir", default_value = "prod")]
        forbid_env: String,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report a build status back to the CI service
    Callback {
        /// Base URL of the CI status service
        #[arg(long)]
        base_url: String,
        /// Project the build belongs to
        #[arg(long)]
        project: String,
        /// Commit hash the status applies to
        #[arg(long)]
        commit: String,
        /// Build status to report, e.g. success or failure
        #[arg(long)]
        status: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cwd = match cli.directory {
        Some(dir) => std::fs::canonicalize(&dir)?,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Validate {
            forbid,
            forbid_env,
            json,
        } => commands::validate::run(
            &cwd,
            &ValidateOptions {
                forbid,
                forbid_env,
                json,
            },
        ),
        Commands::Callback {
            base_url,
            project,
            commit,
            status,
        } => commands::callback::run(&CallbackOptions {
            base_url,
            project,
            commit,
            status,
        }),
    }
}
