use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vercel_ddns::{config::Settings, server};

#[derive(Parser)]
#[command(name = "vercel-ddns")]
#[command(about = "DynDNS2-compatible update endpoint for Vercel DNS")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the update server
    Serve {
        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address, overriding the configuration file
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Show configuration file location and effective settings
    Config {
        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, listen } => {
            let mut settings = Settings::load(config.as_deref())?;
            if let Some(listen) = listen {
                settings.server.listen = listen;
            }

            init_logging(&settings.server.log_level);
            info!("Starting vercel-ddns {}", env!("CARGO_PKG_VERSION"));
            server::run(settings).await?;
        }

        Commands::Config { config } => {
            show_config(config)?;
        }
    }

    Ok(())
}

fn show_config(path: Option<PathBuf>) -> Result<()> {
    let config_path = path.clone().unwrap_or_else(Settings::config_path);
    println!("Configuration file location: {}\n", config_path.display());

    if !config_path.exists() {
        println!("Configuration file not found, built-in defaults apply.\n");
    }

    let settings = Settings::load(path.as_deref())?;
    println!("Effective configuration:\n");
    println!("{}", toml::to_string_pretty(&settings)?);

    Ok(())
}
