/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (field `database_url` reads
/// `DATABASE_URL`) and call `Config::from_env()` once at startup.
///
/// # Panics
///
/// `from_env` panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }

    /// Load from an explicit list of `(NAME, value)` pairs instead of the process environment.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct SampleConfig {
        database_url: String,
        #[serde(default = "default_port")]
        port: u16,
    }

    fn default_port() -> u16 {
        5000
    }

    impl Config for SampleConfig {}

    #[test]
    fn should_read_upper_case_names_into_fields() {
        let config = SampleConfig::from_vars([
            ("DATABASE_URL".to_owned(), "sqlite::memory:".to_owned()),
            ("PORT".to_owned(), "8080".to_owned()),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn should_fall_back_to_serde_default() {
        let config =
            SampleConfig::from_vars([("DATABASE_URL".to_owned(), "x".to_owned())]).unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn should_fail_without_required_var() {
        assert!(SampleConfig::from_vars(Vec::new()).is_err());
    }
}
