use std::path::PathBuf;

use serde::Deserialize;

use madrasa_core::config::Config;

/// Registry service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// sea-orm connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 5000). Env var: `REGISTRY_PORT`.
    #[serde(default = "default_port")]
    pub registry_port: u16,
    /// Root of the upload tree (default `./uploads`). Env var: `UPLOAD_DIR`.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Single allowed browser origin; any origin when unset. Env var: `CORS_ORIGIN`.
    #[serde(default)]
    pub cors_origin: Option<String>,
    /// Apply pending migrations before serving. Env var: `RUN_MIGRATIONS`.
    #[serde(default)]
    pub run_migrations: bool,
}

impl Config for RegistryConfig {}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn should_apply_defaults() {
        let config = RegistryConfig::from_vars(vars(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(config.registry_port, 5000);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert!(config.cors_origin.is_none());
        assert!(!config.run_migrations);
    }

    #[test]
    fn should_read_overrides() {
        let config = RegistryConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/madrasa"),
            ("REGISTRY_PORT", "8080"),
            ("UPLOAD_DIR", "/var/lib/madrasa"),
            ("CORS_ORIGIN", "http://localhost:5173"),
            ("RUN_MIGRATIONS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.registry_port, 8080);
        assert_eq!(config.upload_dir, PathBuf::from("/var/lib/madrasa"));
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));
        assert!(config.run_migrations);
    }

    #[test]
    fn should_require_database_url() {
        assert!(RegistryConfig::from_vars(vars(&[("REGISTRY_PORT", "5000")])).is_err());
    }
}
