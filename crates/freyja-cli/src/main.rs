mod extract;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "freyja-cli")]
#[command(about = "Freyja Studio brand extraction from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline and print the brand profile as JSON
    Scrape {
        /// Site to analyse; `https://` is added when no scheme is given
        url: String,
        /// Completion API key
        #[arg(long, env = "FREYJA_COMPLETION_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Fetch a page and show what the model would receive
    Acquire {
        url: String,
        /// Characters of cleaned text to print
        #[arg(long, default_value_t = 500)]
        excerpt_chars: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = freyja_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Scrape { url, api_key } => {
            extract::run_scrape(&config, &url, api_key).await?;
        }
        Commands::Acquire { url, excerpt_chars } => {
            extract::run_acquire(&config, &url, excerpt_chars).await?;
        }
    }

    Ok(())
}
