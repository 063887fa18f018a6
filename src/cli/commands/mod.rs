//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod config_cmd;
mod parse;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analysis::SectionMapping;
use crate::config::{load_config, LoadOptions};
use crate::llm::LlmProvider;

#[derive(Parser)]
#[command(name = "casebrief")]
#[command(about = "Case document intake and mediation analysis")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the analysis endpoint
    Serve {
        /// Address to bind (PORT, HOST or HOST:PORT; default from config)
        bind: Option<String>,
        /// Completion provider: simulated, ollama, openai, groq or together
        #[arg(long)]
        provider: Option<String>,
        /// Model name for the completion provider
        #[arg(long)]
        model: Option<String>,
    },

    /// Analyze case documents (only the first file is sent)
    Analyze {
        /// Files to select
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Analysis endpoint URL
        #[arg(long)]
        endpoint: Option<String>,
        /// Keep the progress view up for at least this many milliseconds
        #[arg(long)]
        min_loading_ms: Option<u64>,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a saved LLM completion into analysis sections
    Parse {
        /// Completion file, or - for stdin
        input: PathBuf,
        /// How sections are matched to analysis keys
        #[arg(long, value_enum)]
        mapping: Option<SectionMapping>,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let mut config = load_config(options).await?;

    match cli.command {
        Commands::Serve {
            bind,
            provider,
            model,
        } => {
            if let Some(name) = provider {
                if LlmProvider::from_name(&name).is_none() {
                    anyhow::bail!("Unknown provider: {}", name);
                }
                // Same resolution as LLM_PROVIDER, so "groq" also picks its endpoint
                config.llm = config.llm.with_overrides(|var| match var {
                    "LLM_PROVIDER" => Some(name.clone()),
                    _ => std::env::var(var).ok(),
                });
            }
            if let Some(ref model) = model {
                config.llm = config.llm.with_model(model);
            }
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            serve::cmd_serve(&config, &bind).await
        }
        Commands::Analyze {
            files,
            endpoint,
            min_loading_ms,
            json,
        } => {
            if let Some(endpoint) = endpoint {
                config.client.endpoint = endpoint;
            }
            if let Some(ms) = min_loading_ms {
                config.client.min_loading_ms = ms;
            }
            analyze::cmd_analyze(&config.client, &files, json).await
        }
        Commands::Parse {
            input,
            mapping,
            json,
        } => {
            let mapping = mapping.unwrap_or(config.llm.section_mapping);
            parse::cmd_parse(&input, mapping, json).await
        }
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}
