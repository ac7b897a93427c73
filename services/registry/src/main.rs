use clap::{Parser, Subcommand};
use sea_orm::{Database, DatabaseConnection};
use tracing::info;

use madrasa_core::config::Config;
use madrasa_core::tracing::init_tracing;
use madrasa_registry::config::RegistryConfig;
use madrasa_registry::infra::storage::DiskFileStore;
use madrasa_registry::router::build_router;
use madrasa_registry::state::AppState;
use madrasa_registry_migration::{Migrator, MigratorTrait};

#[derive(Parser)]
#[command(name = "registry", about = "Madrasa registry HTTP service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
    /// Serve the HTTP API (default).
    #[default]
    Serve,
    /// Apply pending migrations and exit.
    Migrate,
}

async fn migrate(db: &DatabaseConnection) {
    Migrator::up(db, None).await.expect("failed to apply migrations");
    info!("migrations applied");
}

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn");

    let cli = Cli::parse();
    let config = RegistryConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    match cli.command.unwrap_or_default() {
        Command::Migrate => migrate(&db).await,
        Command::Serve => {
            if config.run_migrations {
                migrate(&db).await;
            }

            let files = DiskFileStore::new(&config.upload_dir);
            files
                .ensure_dirs()
                .await
                .expect("failed to prepare upload directories");

            let state = AppState { db, files };
            let router = build_router(state, config.cors_origin.as_deref());
            let addr = format!("0.0.0.0:{}", config.registry_port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .expect("failed to bind");

            info!(upload_dir = %config.upload_dir.display(), "registry service listening on {addr}");
            axum::serve(listener, router).await.expect("server error");
        }
    }
}
