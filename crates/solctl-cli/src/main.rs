//! solctl - Solution Installer CLI

mod commands;
mod selector;

use clap::{Parser, Subcommand};
use solctl_config::GlobalConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "solctl")]
#[command(author, version, about = "Solution Installer", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a solution and deploy it in containers
    Install {
        /// Solution type from the registry (interactive selection if not specified)
        solution: Option<String>,
        /// Print the deployment result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered solutions
    List,

    /// Show how a directory would be deployed
    Detect {
        /// Directory to inspect
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Print the structure as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge a root env file over a local one and print the result
    MergeEnv {
        /// Env file whose values always win
        root: PathBuf,
        /// Env file contributing keys the root lacks
        local: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => GlobalConfig::config_path()?,
    };
    let config = GlobalConfig::load_from(&config_path)?;
    tracing::debug!(
        "Loaded {} solution(s) from {:?}",
        config.solutions.len(),
        config_path
    );

    match cli.command {
        Commands::Install { solution, json } => {
            let solution = match solution {
                Some(name) => name,
                None => selector::select_solution(&config)?,
            };
            commands::install(config, &solution, json).await?;
        }
        Commands::List => commands::list(&config),
        Commands::Detect { dir, json } => commands::detect(&dir, json)?,
        Commands::MergeEnv { root, local } => commands::merge_env(&root, &local)?,
        Commands::Config => commands::config(&config, &config_path)?,
    }

    Ok(())
}
