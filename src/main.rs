use anyhow::Result;
use clap::{Parser, Subcommand};

/// mealplanner - Household weekly meal planning
#[derive(Parser)]
#[command(name = "mealplanner")]
#[command(about = "Household weekly meal planning and shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mealplanner::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealplanner::observability::init_observability(
        "mealplanner",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: mealplanner::Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    mealplanner::migrate::migrate(&config).await?;
    mealplanner::server::serve(config, host, port).await
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: mealplanner::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    mealplanner::migrate::migrate(&config).await
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: mealplanner::Config) -> Result<()> {
    tracing::info!("Resetting database...");

    mealplanner::migrate::reset(&config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
