//! Scratch SQLite databases for integration tests.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::scratch::ScratchDir;

/// A file-backed SQLite database living in its own scratch directory.
///
/// Keep the value alive for the duration of the test; dropping it removes the file.
pub struct ScratchDb {
    pub conn: DatabaseConnection,
    _dir: ScratchDir,
}

impl ScratchDb {
    /// Open an empty database. Schema setup (migrations) is the caller's job.
    pub async fn connect() -> Self {
        let dir = ScratchDir::new("db");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("registry.db").display());
        let mut options = ConnectOptions::new(url);
        options.max_connections(1).sqlx_logging(false);
        let conn = Database::connect(options)
            .await
            .unwrap_or_else(|e| panic!("cannot open scratch database: {e}"));
        Self { conn, _dir: dir }
    }
}
