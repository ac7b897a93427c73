use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use madrasa_domain::id::SubjectId;

use super::{JsonBody, deleted, path_id};
use crate::domain::form::SubjectForm;
use crate::domain::types::Subject;
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::subject::{
    CreateSubjectUseCase, DeleteSubjectUseCase, GetSubjectUseCase, ListSubjectsUseCase,
    UpdateSubjectUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: SubjectId,
    pub subject_name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Subject> for SubjectResponse {
    fn from(s: Subject) -> Self {
        Self {
            id: s.id,
            subject_name: s.subject_name,
            description: s.description,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

pub async fn create_subject(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<SubjectForm>,
) -> Result<(StatusCode, Json<SubjectResponse>), RegistryError> {
    let usecase = CreateSubjectUseCase {
        repo: state.subject_repo(),
    };
    Ok((StatusCode::CREATED, Json(usecase.execute(form).await?.into())))
}

pub async fn list_subjects(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubjectResponse>>, RegistryError> {
    let usecase = ListSubjectsUseCase {
        repo: state.subject_repo(),
    };
    let subjects = usecase.execute().await?;
    Ok(Json(subjects.into_iter().map(Into::into).collect()))
}

pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubjectResponse>, RegistryError> {
    let id = path_id::<SubjectId>(&id, RegistryError::SubjectNotFound)?;
    let usecase = GetSubjectUseCase {
        repo: state.subject_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<SubjectForm>,
) -> Result<Json<SubjectResponse>, RegistryError> {
    let id = path_id::<SubjectId>(&id, RegistryError::SubjectNotFound)?;
    let usecase = UpdateSubjectUseCase {
        repo: state.subject_repo(),
    };
    Ok(Json(usecase.execute(id, patch).await?.into()))
}

pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    let id = path_id::<SubjectId>(&id, RegistryError::SubjectNotFound)?;
    let usecase = DeleteSubjectUseCase {
        repo: state.subject_repo(),
    };
    usecase.execute(id).await?;
    Ok(deleted("Subject"))
}
