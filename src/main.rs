//! # Tenancy Ledger operator CLI
//!
//! Schema management, lookup seeding and the unpaid-lease audit.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tenancy_ledger::{
    config::{AppConfig, ConfigLoader},
    db,
    migration::{Migrator, MigratorTrait},
    repositories::LeaseRepository,
    seeds::seed_lookups,
    telemetry,
};

#[derive(Parser)]
#[command(name = "tenancy-ledger", version, about = "Tenancy ledger operator tool")]
struct Cli {
    /// Override LEDGER_DATABASE_URL
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Migrate,
    /// Revert the most recent migrations
    Rollback {
        /// Number of migrations to revert
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Insert default lookup rows (idempotent)
    Seed,
    /// List tenants holding more than one unpaid lease
    Audit,
}

impl Commands {
    /// Whether startup hooks (auto-migrate, seeding) may run before the command.
    fn runs_startup_hooks(&self) -> bool {
        matches!(self, Commands::Seed | Commands::Audit)
    }
}

#[derive(Serialize)]
struct MigrationStatus {
    applied: Vec<String>,
    pending: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .load()
        .context("Failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    telemetry::init_tracing(&config).context("Failed to initialize tracing")?;
    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted) = config.redacted_json() {
        tracing::debug!(config = %redacted, "Effective configuration");
    }

    let conn = connect(&config).await?;

    if cli.cmd.runs_startup_hooks() {
        run_startup_hooks(&config, &conn).await?;
    }

    match cli.cmd {
        Commands::Migrate => {
            let applied = db::run_migrations(&conn).await?;
            println!("Applied {applied} migration(s)");
        }
        Commands::Rollback { steps } => {
            Migrator::down(&conn, Some(steps))
                .await
                .context("Failed to roll back migrations")?;
            println!("Rolled back {steps} migration(s)");
        }
        Commands::Status => {
            let status = migration_status(&conn).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Seed => {
            let report = seed_lookups(&conn).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Audit => {
            let breaches = LeaseRepository::new(Arc::new(conn))
                .find_invariant_breaches()
                .await
                .context("Failed to audit leases")?;
            println!("{}", serde_json::to_string_pretty(&breaches)?);
            if !breaches.is_empty() {
                bail!(
                    "{} tenant(s) hold more than one unpaid lease",
                    breaches.len()
                );
            }
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> Result<DatabaseConnection> {
    let conn = db::init_pool(config).await?;
    db::health_check(&conn).await?;
    Ok(conn)
}

async fn run_startup_hooks(config: &AppConfig, conn: &DatabaseConnection) -> Result<()> {
    if config.auto_migrate {
        db::run_migrations(conn).await?;
    }
    if config.seed_on_start {
        seed_lookups(conn).await?;
    }
    Ok(())
}

async fn migration_status(conn: &DatabaseConnection) -> Result<MigrationStatus> {
    let applied = Migrator::get_applied_migrations(conn)
        .await
        .context("Failed to list applied migrations")?;
    let pending = Migrator::get_pending_migrations(conn)
        .await
        .context("Failed to list pending migrations")?;

    Ok(MigrationStatus {
        applied: applied.iter().map(|m| m.name().to_string()).collect(),
        pending: pending.iter().map(|m| m.name().to_string()).collect(),
    })
}
