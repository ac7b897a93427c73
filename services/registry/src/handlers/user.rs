use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use madrasa_domain::id::UserId;

use super::JsonBody;
use crate::domain::form::UserForm;
use crate::domain::types::User;
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::user::{CreateUserUseCase, ListUsersUseCase};

/// Account as shown to clients. The password hash never leaves the service.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /api/users ──────────────────────────────────────────────────────────

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<UserForm>,
) -> Result<(StatusCode, Json<UserResponse>), RegistryError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        hasher: state.password_hasher(),
    };
    let user = usecase.execute(form).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, RegistryError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
