use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hestia::config::Config;
use hestia::logging::{get_logger, init_logging};
use hestia::poller::DecisionPoller;
use hestia::source::{FileSource, InputSnapshot};
use hestia::{evaluate_with, prices, schema};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "hestia")]
#[command(version = env!("APP_VERSION"), about = "Price-driven decision engine for home batteries")]
struct Cli {
    /// Configuration file (defaults to HESTIA_CONFIG or the standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one input snapshot and print the decision as JSON
    Evaluate {
        /// YAML or JSON file with `prices` and `soc`
        #[arg(short, long)]
        inputs: PathBuf,

        /// Print the one-line explanation instead of JSON
        #[arg(long)]
        explain: bool,
    },

    /// Print a per-slot overview of the forecast in an input snapshot
    Overview {
        #[arg(short, long)]
        inputs: PathBuf,
    },

    /// Poll the configured source until interrupted
    Run,

    /// Print the JSON schema of the configuration file
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Evaluate { inputs, explain } => {
            let config = load_config(config_path)?;
            let snapshot = read_snapshot(&inputs)?;
            let decision = evaluate_with(
                &snapshot.prices,
                snapshot.battery_state(),
                &config.battery,
                config.pricing.expensive_threshold,
                &config.tuning,
            );
            if explain {
                println!("{}", decision.explain());
            } else {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            }
        }
        Commands::Overview { inputs } => {
            let config = load_config(config_path)?;
            let snapshot = read_snapshot(&inputs)?;
            println!(
                "{}",
                prices::overview(
                    &snapshot.prices,
                    config.pricing.expensive_threshold,
                    &config.tuning,
                    &config.pricing.currency_symbol,
                )
            );
        }
        Commands::Run => run_poller(load_config(config_path)?).await?,
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema::config_schema())?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load_validated(path).context("Failed to load configuration")
}

fn read_snapshot(path: &Path) -> Result<InputSnapshot> {
    let snapshot = InputSnapshot::from_file(path)
        .with_context(|| format!("Failed to read inputs from {}", path.display()))?;
    snapshot.validate()?;
    Ok(snapshot)
}

async fn run_poller(config: Config) -> Result<()> {
    init_logging(&config.logging)?;
    let logger = get_logger("main");
    logger.info(&format!("Hestia {} starting up", env!("APP_VERSION")));

    let source = Arc::new(FileSource::new(&config.source.path));
    let mut poller = DecisionPoller::new(config, source);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poll_task = tokio::spawn(async move {
        poller.run(shutdown_rx).await;
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    logger.info("Shutdown requested");
    let _ = shutdown_tx.send(true);
    poll_task.await.context("Poller task failed")?;
    logger.info("Shutdown complete");
    Ok(())
}
