use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use madrasa_domain::id::StipendId;

use super::{JsonBody, deleted, path_id};
use crate::domain::form::StipendForm;
use crate::domain::types::Stipend;
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::stipend::{
    CreateStipendUseCase, DeleteStipendUseCase, GetStipendUseCase, ListStipendsUseCase,
    UpdateStipendUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StipendResponse {
    pub id: StipendId,
    pub stipend_name: String,
    #[serde(serialize_with = "madrasa_core::serde::compact_f64")]
    pub amount: f64,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Stipend> for StipendResponse {
    fn from(s: Stipend) -> Self {
        Self {
            id: s.id,
            stipend_name: s.stipend_name,
            amount: s.amount,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

pub async fn create_stipend(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<StipendForm>,
) -> Result<(StatusCode, Json<StipendResponse>), RegistryError> {
    let usecase = CreateStipendUseCase {
        repo: state.stipend_repo(),
    };
    Ok((StatusCode::CREATED, Json(usecase.execute(form).await?.into())))
}

/// Ordered by name.
pub async fn list_stipends(
    State(state): State<AppState>,
) -> Result<Json<Vec<StipendResponse>>, RegistryError> {
    let usecase = ListStipendsUseCase {
        repo: state.stipend_repo(),
    };
    let stipends = usecase.execute().await?;
    Ok(Json(stipends.into_iter().map(Into::into).collect()))
}

pub async fn get_stipend(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StipendResponse>, RegistryError> {
    let id = path_id::<StipendId>(&id, RegistryError::StipendNotFound)?;
    let usecase = GetStipendUseCase {
        repo: state.stipend_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

pub async fn update_stipend(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<StipendForm>,
) -> Result<Json<StipendResponse>, RegistryError> {
    let id = path_id::<StipendId>(&id, RegistryError::StipendNotFound)?;
    let usecase = UpdateStipendUseCase {
        repo: state.stipend_repo(),
    };
    Ok(Json(usecase.execute(id, patch).await?.into()))
}

pub async fn delete_stipend(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    let id = path_id::<StipendId>(&id, RegistryError::StipendNotFound)?;
    let usecase = DeleteStipendUseCase {
        repo: state.stipend_repo(),
    };
    usecase.execute(id).await?;
    Ok(deleted("Stipend"))
}
