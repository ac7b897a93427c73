use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use madrasa_domain::class::Shift;
use madrasa_domain::id::{ClassId, DepartmentId};

use super::{JsonBody, deleted, filter_id, path_id};
use crate::domain::form::ClassForm;
use crate::domain::types::{ClassView, DepartmentRef, TeacherRef};
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::class::{
    CreateClassUseCase, DeleteClassUseCase, GetClassUseCase, ListClassesUseCase,
    UpdateClassUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: ClassId,
    pub class_name: String,
    pub teacher: Option<TeacherRef>,
    pub department: Option<DepartmentRef>,
    pub shift: Vec<Shift>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<ClassView> for ClassResponse {
    fn from(view: ClassView) -> Self {
        Self {
            id: view.class.id,
            class_name: view.class.class_name,
            teacher: view.teacher,
            department: view.department,
            shift: view.class.shifts,
            created_at: view.class.created_at,
            updated_at: view.class.updated_at,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct ClassListQuery {
    pub department: Option<String>,
}

pub async fn create_class(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<ClassForm>,
) -> Result<(StatusCode, Json<ClassResponse>), RegistryError> {
    let usecase = CreateClassUseCase {
        repo: state.class_repo(),
    };
    let view = usecase.execute(form).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

pub async fn list_classes(
    State(state): State<AppState>,
    Query(query): Query<ClassListQuery>,
) -> Result<Json<Vec<ClassResponse>>, RegistryError> {
    let department = filter_id::<DepartmentId>(query.department.as_deref(), "department")?;
    let usecase = ListClassesUseCase {
        repo: state.class_repo(),
    };
    let views = usecase.execute(department).await?;
    Ok(Json(views.into_iter().map(ClassResponse::from).collect()))
}

pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassResponse>, RegistryError> {
    let id = path_id::<ClassId>(&id, RegistryError::ClassNotFound)?;
    let usecase = GetClassUseCase {
        repo: state.class_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ClassForm>,
) -> Result<Json<ClassResponse>, RegistryError> {
    let id = path_id::<ClassId>(&id, RegistryError::ClassNotFound)?;
    let usecase = UpdateClassUseCase {
        repo: state.class_repo(),
    };
    Ok(Json(usecase.execute(id, patch).await?.into()))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    let id = path_id::<ClassId>(&id, RegistryError::ClassNotFound)?;
    let usecase = DeleteClassUseCase {
        repo: state.class_repo(),
    };
    usecase.execute(id).await?;
    Ok(deleted("Class"))
}
