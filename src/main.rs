mod cli;
mod server;
mod tools;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mcp_instruct::config::InstructConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mcp-instruct",
    version,
    about = "Personal knowledge base and agent persona MCP server"
)]
struct Cli {
    /// Profile to operate on (overrides config and MCP_INSTRUCT_PROFILE)
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport to serve on (defaults to [server] transport in config)
        #[arg(long, value_enum)]
        transport: Option<Transport>,
    },
    /// Export the knowledge base as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the knowledge base with an exported JSON file
    Import {
        file: PathBuf,
    },
    /// Fuzzy search the knowledge base
    Search {
        query: String,
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Show knowledge base statistics
    Stats,
    /// Show recent changes
    History {
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let mut config = InstructConfig::load()?;
    if let Some(profile) = cli.profile {
        config.storage.profile = profile;
    }

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            let transport = match transport {
                Some(t) => t,
                None => match config.server.transport.as_str() {
                    "stdio" => Transport::Stdio,
                    "http" => Transport::Http,
                    other => bail!("unknown transport '{other}' in config: expected stdio or http"),
                },
            };
            match transport {
                Transport::Stdio => server::serve_stdio(config).await?,
                Transport::Http => server::serve_http(config).await?,
            }
        }
        Command::Export { output } => cli::export::export(&config, output.as_deref())?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::Search { query, limit } => cli::search::search(&config, &query, limit)?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::History { limit } => cli::history::history(&config, limit)?,
    }

    Ok(())
}
