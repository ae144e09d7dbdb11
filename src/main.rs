//! Roulette API Server Binary

use clap::{Args, Parser, Subcommand};
use roulette::{api::ApiServer, config::AppConfig, ConfigLoader, Services};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "roulette")]
#[command(about = "Roulette table service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API over fresh in-memory stores
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// API server host, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// API server port, overrides the config file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    init_tracing(&config);

    info!(
        host = %config.server.host,
        port = config.server.port,
        "starting roulette API server"
    );

    ApiServer::new(config.server, Services::in_memory()).run().await?;
    Ok(())
}

fn load_config(args: &ServeArgs) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let loader = match args.config {
        Some(ref path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    roulette::config::validate(&config)?;

    Ok(config)
}

fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();
}
