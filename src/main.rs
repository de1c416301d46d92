//! medvault CLI entry point

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use medvault::{
    commands::{cmd_load, cmd_lookup, cmd_serve, print_load_report, print_lookup},
    config::Config,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "medvault")]
#[command(version, about = "Medication catalog service and lookup client", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset, then serve the HTTP API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Dataset file (overrides MEDVAULT_DATA)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Do not run the bulk loader at startup
        #[arg(long)]
        no_load: bool,
    },

    /// Run the bulk loader once and exit
    Load {
        /// Dataset file (overrides MEDVAULT_DATA)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Look up a medicine by name through the API
    Lookup {
        /// Medicine name (case-insensitive exact match)
        name: String,

        /// API base URL (overrides MEDVAULT_API_URL)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    // Handle completions command (doesn't need config/db)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "medvault", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::from_env().context("Failed to read configuration")?;

    match cli.command {
        Commands::Serve {
            port,
            data,
            no_load,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(data) = data {
                config.loader.data_path = data;
            }
            if no_load {
                config.loader.load_on_start = false;
            }
            config.validate()?;

            cmd_serve(&config).await.context("Server stopped")?;
        }

        Commands::Load { data } => {
            if let Some(data) = data {
                config.loader.data_path = data;
            }

            let report = cmd_load(&config).await.context("Bulk load failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_load_report(&report);
            }
        }

        Commands::Lookup { name, api_url } => {
            let api_url = api_url.unwrap_or_else(|| config.api_url.clone());
            let result = cmd_lookup(&api_url, &name).await?;

            if cli.json {
                let value = match &result {
                    Ok(outcome) => serde_json::to_value(outcome)?,
                    Err(e) => serde_json::json!({ "state": "failed", "error": e.to_string() }),
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_lookup(&result);
            }

            if result.is_err() {
                std::process::exit(2);
            }
        }

        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
