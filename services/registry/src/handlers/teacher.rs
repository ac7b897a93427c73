use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use madrasa_domain::id::{SubjectId, TeacherId};

use super::{JsonBody, deleted, filter_id, path_id};
use crate::domain::form::{TeacherForm, UniqueProbe};
use crate::domain::types::{SubjectRef, TeacherView};
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::teacher::{
    CheckTeacherUniqueUseCase, CreateTeacherUseCase, DeleteTeacherUseCase, GetTeacherUseCase,
    ListTeachersUseCase, UpdateTeacherUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherResponse {
    pub id: TeacherId,
    pub name: String,
    pub teacher_id: String,
    pub identity_card_no: String,
    pub age: i32,
    pub qualification: String,
    pub subject: Option<SubjectRef>,
    pub experience: i32,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub father_name: String,
    pub married_status: String,
    pub emergency_number: String,
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub date_of_birth: NaiveDate,
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub date_of_joining: NaiveDate,
    pub status: String,
    #[serde(serialize_with = "madrasa_core::serde::compact_f64")]
    pub salary: f64,
    pub period_of_service: String,
    #[serde(serialize_with = "madrasa_core::serde::compact_f64")]
    pub increased: f64,
    #[serde(serialize_with = "madrasa_core::serde::compact_f64")]
    pub total_monthly_salary_after_increment: f64,
    pub resident_status: String,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<TeacherView> for TeacherResponse {
    fn from(view: TeacherView) -> Self {
        let t = view.teacher;
        Self {
            id: t.id,
            name: t.name,
            teacher_id: t.teacher_id,
            identity_card_no: t.identity_card_no,
            age: t.age,
            qualification: t.qualification,
            subject: view.subject,
            experience: t.experience,
            contact_number: t.contact_number,
            email: t.email,
            address: t.address,
            father_name: t.father_name,
            married_status: t.married_status,
            emergency_number: t.emergency_number,
            date_of_birth: t.date_of_birth,
            date_of_joining: t.date_of_joining,
            status: t.status,
            salary: t.salary,
            period_of_service: t.period_of_service,
            increased: t.increased,
            total_monthly_salary_after_increment: t.total_monthly_salary_after_increment,
            resident_status: t.resident_status,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct TeacherListQuery {
    pub subject: Option<String>,
}

// ── POST /api/teachers ───────────────────────────────────────────────────────

pub async fn create_teacher(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<TeacherForm>,
) -> Result<(StatusCode, Json<TeacherResponse>), RegistryError> {
    let usecase = CreateTeacherUseCase {
        repo: state.teacher_repo(),
    };
    let view = usecase.execute(form).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── GET /api/teachers ────────────────────────────────────────────────────────

pub async fn list_teachers(
    State(state): State<AppState>,
    Query(query): Query<TeacherListQuery>,
) -> Result<Json<Vec<TeacherResponse>>, RegistryError> {
    let subject = filter_id::<SubjectId>(query.subject.as_deref(), "subject")?;
    let usecase = ListTeachersUseCase {
        repo: state.teacher_repo(),
    };
    let views = usecase.execute(subject).await?;
    Ok(Json(views.into_iter().map(TeacherResponse::from).collect()))
}

// ── GET /api/teachers/{id} ───────────────────────────────────────────────────

pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeacherResponse>, RegistryError> {
    let id = path_id::<TeacherId>(&id, RegistryError::TeacherNotFound)?;
    let usecase = GetTeacherUseCase {
        repo: state.teacher_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PUT /api/teachers/{id} ───────────────────────────────────────────────────

pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<TeacherForm>,
) -> Result<Json<TeacherResponse>, RegistryError> {
    let id = path_id::<TeacherId>(&id, RegistryError::TeacherNotFound)?;
    let usecase = UpdateTeacherUseCase {
        repo: state.teacher_repo(),
    };
    Ok(Json(usecase.execute(id, patch).await?.into()))
}

// ── DELETE /api/teachers/{id} ────────────────────────────────────────────────

pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    let id = path_id::<TeacherId>(&id, RegistryError::TeacherNotFound)?;
    let usecase = DeleteTeacherUseCase {
        repo: state.teacher_repo(),
    };
    usecase.execute(id).await?;
    Ok(deleted("Teacher"))
}

// ── POST /api/teachers/check-unique ──────────────────────────────────────────

pub async fn check_teacher_unique(
    State(state): State<AppState>,
    JsonBody(probe): JsonBody<UniqueProbe>,
) -> Result<Json<Value>, RegistryError> {
    let usecase = CheckTeacherUniqueUseCase {
        repo: state.teacher_repo(),
    };
    let is_unique = usecase.execute(probe).await?;
    Ok(Json(json!({ "isUnique": is_unique })))
}
