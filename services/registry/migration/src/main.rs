use sea_orm_migration::prelude::*;

use madrasa_registry_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
