use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use madrasa_domain::id::{ClassId, StipendId, StudentId};
use madrasa_domain::student::{LeavePeriod, age_on};

use super::upload::StudentUpload;
use super::{JsonBody, deleted, filter_id, path_id};
use crate::domain::form::UniqueProbe;
use crate::domain::types::{ClassRef, DepartmentRef, StudentView};
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::student::{
    CheckStudentUniqueUseCase, CreateStudentUseCase, DeleteStudentUseCase, GetStudentUseCase,
    ListStudentsUseCase, UpdateStudentUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePeriodResponse {
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub from_date: NaiveDate,
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub to_date: NaiveDate,
}

impl From<&LeavePeriod> for LeavePeriodResponse {
    fn from(period: &LeavePeriod) -> Self {
        Self {
            from_date: period.from_date,
            to_date: period.to_date,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: StudentId,
    pub name: String,
    pub father_name: String,
    pub role_number: String,
    pub registration_number: String,
    pub father_identity_card: String,
    pub country: String,
    pub current_address: String,
    pub permanent_address: String,
    pub guardian_name: String,
    pub guardian_address: String,
    pub guardian_phone: String,
    pub school_history: String,
    pub last_seminary: String,
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub date_of_joining: NaiveDate,
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub date_of_birth: NaiveDate,
    /// Whole years on the day of the read; never stored.
    pub age: i32,
    pub emergency_number: String,
    pub qualification: String,
    pub class: Option<ClassRef>,
    pub department: Option<DepartmentRef>,
    pub gender: &'static str,
    pub status: &'static str,
    #[serde(serialize_with = "madrasa_core::serde::opt_day_as_utc_midnight")]
    pub expelled_date: Option<NaiveDate>,
    pub leave_records: Vec<LeavePeriodResponse>,
    pub stipend_id: Option<StipendId>,
    pub has_stipend: bool,
    pub photo: Option<String>,
    pub birth_certificate: Option<String>,
    pub b_form: Option<String>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl StudentResponse {
    pub fn new(view: StudentView, today: NaiveDate) -> Self {
        let StudentView {
            student: s,
            class,
            department,
        } = view;
        Self {
            id: s.id,
            age: age_on(s.date_of_birth, today),
            status: s.status.kind().as_str(),
            expelled_date: s.status.expelled_date(),
            leave_records: s.status.leave_records().iter().map(Into::into).collect(),
            gender: s.gender.as_str(),
            name: s.name,
            father_name: s.father_name,
            role_number: s.role_number,
            registration_number: s.registration_number,
            father_identity_card: s.father_identity_card,
            country: s.country,
            current_address: s.current_address,
            permanent_address: s.permanent_address,
            guardian_name: s.guardian_name,
            guardian_address: s.guardian_address,
            guardian_phone: s.guardian_phone,
            school_history: s.school_history,
            last_seminary: s.last_seminary,
            date_of_joining: s.date_of_joining,
            date_of_birth: s.date_of_birth,
            emergency_number: s.emergency_number,
            qualification: s.qualification,
            class,
            department,
            stipend_id: s.stipend_id,
            has_stipend: s.has_stipend,
            photo: s.documents.photo,
            birth_certificate: s.documents.birth_certificate,
            b_form: s.documents.b_form,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

fn respond(view: StudentView) -> StudentResponse {
    StudentResponse::new(view, Utc::now().date_naive())
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct StudentListQuery {
    pub class: Option<String>,
}

// ── POST /api/students ───────────────────────────────────────────────────────

pub async fn create_student(
    State(state): State<AppState>,
    StudentUpload(submission): StudentUpload,
) -> Result<(StatusCode, Json<StudentResponse>), RegistryError> {
    let usecase = CreateStudentUseCase {
        repo: state.student_repo(),
        files: state.file_store(),
    };
    let view = usecase.execute(submission).await?;
    Ok((StatusCode::CREATED, Json(respond(view))))
}

// ── GET /api/students ────────────────────────────────────────────────────────

pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> Result<Json<Vec<StudentResponse>>, RegistryError> {
    let class = filter_id::<ClassId>(query.class.as_deref(), "class")?;
    let usecase = ListStudentsUseCase {
        repo: state.student_repo(),
    };
    let views = usecase.execute(class).await?;
    let today = Utc::now().date_naive();
    Ok(Json(
        views
            .into_iter()
            .map(|v| StudentResponse::new(v, today))
            .collect(),
    ))
}

// ── GET /api/students/{id} ───────────────────────────────────────────────────

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentResponse>, RegistryError> {
    let id = path_id::<StudentId>(&id, RegistryError::StudentNotFound)?;
    let usecase = GetStudentUseCase {
        repo: state.student_repo(),
    };
    Ok(Json(respond(usecase.execute(id).await?)))
}

// ── PUT /api/students/{id} ───────────────────────────────────────────────────

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    StudentUpload(submission): StudentUpload,
) -> Result<Json<StudentResponse>, RegistryError> {
    let id = path_id::<StudentId>(&id, RegistryError::StudentNotFound)?;
    let usecase = UpdateStudentUseCase {
        repo: state.student_repo(),
        files: state.file_store(),
    };
    Ok(Json(respond(usecase.execute(id, submission).await?)))
}

// ── DELETE /api/students/{id} ────────────────────────────────────────────────

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    let id = path_id::<StudentId>(&id, RegistryError::StudentNotFound)?;
    let usecase = DeleteStudentUseCase {
        repo: state.student_repo(),
        files: state.file_store(),
    };
    usecase.execute(id).await?;
    Ok(deleted("Student"))
}

// ── POST /api/students/check-unique ──────────────────────────────────────────

pub async fn check_student_unique(
    State(state): State<AppState>,
    JsonBody(probe): JsonBody<UniqueProbe>,
) -> Result<Json<Value>, RegistryError> {
    let usecase = CheckStudentUniqueUseCase {
        repo: state.student_repo(),
    };
    let is_unique = usecase.execute(probe).await?;
    Ok(Json(json!({ "isUnique": is_unique })))
}
