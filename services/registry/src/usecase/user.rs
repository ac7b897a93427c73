use chrono::Utc;

use madrasa_domain::id::UserId;
use madrasa_domain::validate::{FieldErrors, is_account_email};

use super::{text, text_matching};
use crate::domain::form::UserForm;
use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::User;
use crate::error::RegistryError;

const MIN_NAME_CHARS: usize = 3;

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserUseCase<R: UserRepository, H: PasswordHasher> {
    pub repo: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> CreateUserUseCase<R, H> {
    pub async fn execute(&self, form: UserForm) -> Result<User, RegistryError> {
        let e = &mut FieldErrors::new();
        let name = text(e, "name", &form.name);
        if name
            .as_ref()
            .is_some_and(|n| n.chars().count() < MIN_NAME_CHARS)
        {
            e.add("name", format!("name must be at least {MIN_NAME_CHARS} characters"));
        }
        let email = form.email.as_ref().map(|v| v.trim().to_lowercase());
        let email = text_matching(e, "email", &email, is_account_email, "is not a valid email address");
        // Passwords are taken verbatim; surrounding spaces are part of the secret.
        let password = form.password.clone().filter(|p| !p.is_empty());
        if password.is_none() {
            e.required("password");
        }
        let (Some(name), Some(email), Some(password), true) = (name, email, password, e.is_empty())
        else {
            return Err(std::mem::take(e).into());
        };

        if self.repo.email_taken(&email).await? {
            return Err(RegistryError::DuplicateField { field: "email" });
        }

        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            name,
            email,
            password_hash: self.hasher.hash(&password).await?,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        tracing::info!(id = %user.id, "user created");
        Ok(user)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<User>, RegistryError> {
        self.repo.list().await
    }
}
