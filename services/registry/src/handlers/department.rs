use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use madrasa_domain::id::DepartmentId;

use super::{JsonBody, deleted, path_id};
use crate::domain::form::DepartmentForm;
use crate::domain::types::Department;
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::department::{
    CreateDepartmentUseCase, DeleteDepartmentUseCase, GetDepartmentUseCase,
    ListDepartmentsUseCase, UpdateDepartmentUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: DepartmentId,
    pub department_name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Department> for DepartmentResponse {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            department_name: d.department_name,
            description: d.description,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

pub async fn create_department(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<DepartmentForm>,
) -> Result<(StatusCode, Json<DepartmentResponse>), RegistryError> {
    let usecase = CreateDepartmentUseCase {
        repo: state.department_repo(),
    };
    let department = usecase.execute(form).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentResponse>>, RegistryError> {
    let usecase = ListDepartmentsUseCase {
        repo: state.department_repo(),
    };
    let departments = usecase.execute().await?;
    Ok(Json(departments.into_iter().map(Into::into).collect()))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DepartmentResponse>, RegistryError> {
    let id = path_id::<DepartmentId>(&id, RegistryError::DepartmentNotFound)?;
    let usecase = GetDepartmentUseCase {
        repo: state.department_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<DepartmentForm>,
) -> Result<Json<DepartmentResponse>, RegistryError> {
    let id = path_id::<DepartmentId>(&id, RegistryError::DepartmentNotFound)?;
    let usecase = UpdateDepartmentUseCase {
        repo: state.department_repo(),
    };
    Ok(Json(usecase.execute(id, patch).await?.into()))
}

pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    let id = path_id::<DepartmentId>(&id, RegistryError::DepartmentNotFound)?;
    let usecase = DeleteDepartmentUseCase {
        repo: state.department_repo(),
    };
    usecase.execute(id).await?;
    Ok(deleted("Department"))
}
