use anyhow::{Context, anyhow};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::Argon2;

use crate::domain::repository::PasswordHasher;
use crate::error::RegistryError;

/// Argon2id with the crate's default parameters, emitting PHC strings.
///
/// Hashing runs on the blocking pool so request workers keep serving.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, RegistryError> {
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .context("join password hashing task")??;
        Ok(hash)
    }
}

fn hash_blocking(password: &str) -> Result<String, RegistryError> {
    use argon2::PasswordHasher as _;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}
