use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;

use calstar_core::migrations::Migrator;
use calstar_core::{App, Config, logging};

#[derive(Parser)]
#[command(name = "calstar")]
#[command(about = "Course catalog, resources and reviews for Berkeley students")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending migrations, then serve the API (default)
    Serve,
    /// Run pending migrations
    Migrate,
    /// Revert applied migrations
    Rollback {
        /// Number of migrations to revert
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_logging_json();
    } else {
        logging::init_logging();
    }

    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let app = App::with_config(config).await?;
            app.run().await?;
        }
        Commands::Migrate => {
            let db = calstar_core::db::connect(&config).await?;
            tracing::info!("Running pending database migrations...");
            Migrator::up(&db, None).await?;
            tracing::info!("Migrations complete.");
        }
        Commands::Rollback { steps } => {
            let db = calstar_core::db::connect(&config).await?;
            tracing::info!(steps, "Rolling back migrations...");
            Migrator::down(&db, Some(steps)).await?;
            tracing::info!("Rollback complete.");
        }
    }

    Ok(())
}
