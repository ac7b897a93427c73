use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder,
};

use madrasa_core::sea_ext::FilterLowerEq;
use madrasa_domain::id::UserId;
use madrasa_registry_schema::users;

use super::unique_violation;
use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::RegistryError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(&self) -> Result<Vec<User>, RegistryError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn email_taken(&self, email: &str) -> Result<bool, RegistryError> {
        let count = users::Entity::find()
            .filter_lower_eq(users::Column::Email, email.trim())
            .count(&self.db)
            .await
            .context("check user email")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &User) -> Result<(), RegistryError> {
        let model = users::ActiveModel {
            id: Set(user.id.0),
            name: Set(user.name.clone()),
            email: Set(user.email.to_lowercase()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };
        match model.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if unique_violation(&e).is_some() => {
                Err(RegistryError::DuplicateField { field: "email" })
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
