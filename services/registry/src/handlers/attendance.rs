use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use madrasa_domain::attendance::AttendanceStatus;
use madrasa_domain::id::{AttendanceId, ClassId, StudentId};
use madrasa_domain::sort::Sort;

use super::student::StudentResponse;
use super::{JsonBody, deleted, path_id};
use crate::domain::form::{AttendanceForm, AttendanceQuery};
use crate::domain::types::{AttendanceFilter, AttendanceView, ClassRef, StudentRef};
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::attendance::{
    ClassRosterUseCase, CreateAttendanceUseCase, DeleteAttendanceUseCase, FindAttendanceUseCase,
    GetAttendanceUseCase, ListAttendanceUseCase, StudentAttendanceHistoryUseCase,
    UpdateAttendanceStatusUseCase, class_on_date, date_range, monthly, query_id,
    student_in_class, student_in_class_on_date,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: AttendanceId,
    pub student: Option<StudentRef>,
    pub class: Option<ClassRef>,
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<AttendanceView> for AttendanceResponse {
    fn from(view: AttendanceView) -> Self {
        let a = view.attendance;
        Self {
            id: a.id,
            student: view.student,
            class: view.class,
            date: a.date,
            status: a.status,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentHistoryResponse {
    pub attendance: Vec<AttendanceResponse>,
    pub student_name: String,
}

fn responses(views: Vec<AttendanceView>) -> Vec<AttendanceResponse> {
    views.into_iter().map(AttendanceResponse::from).collect()
}

async fn list(
    state: &AppState,
    filter: AttendanceFilter,
) -> Result<Json<Vec<AttendanceResponse>>, RegistryError> {
    let usecase = ListAttendanceUseCase {
        repo: state.attendance_repo(),
    };
    Ok(Json(responses(usecase.execute(filter, Sort::Asc).await?)))
}

// ── POST /api/studentAttendance ──────────────────────────────────────────────

pub async fn create_attendance(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<AttendanceForm>,
) -> Result<(StatusCode, Json<AttendanceResponse>), RegistryError> {
    let usecase = CreateAttendanceUseCase {
        repo: state.attendance_repo(),
    };
    let view = usecase.execute(form).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── GET /api/studentAttendance/by-student-class-date ─────────────────────────

pub async fn get_by_student_class_date(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<AttendanceResponse>, RegistryError> {
    let filter = student_in_class_on_date(&query)?;
    let usecase = FindAttendanceUseCase {
        repo: state.attendance_repo(),
    };
    Ok(Json(usecase.execute(filter).await?.into()))
}

// ── GET /api/studentAttendance/by-class-date ─────────────────────────────────

pub async fn list_by_class_date(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, RegistryError> {
    list(&state, class_on_date(&query)?).await
}

// ── GET /api/studentAttendance/by-student-class ──────────────────────────────

pub async fn list_by_student_class(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, RegistryError> {
    list(&state, student_in_class(&query)?).await
}

// ── GET /api/studentAttendance/by-date-range ─────────────────────────────────

pub async fn list_by_date_range(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, RegistryError> {
    list(&state, date_range(&query)?).await
}

// ── GET /api/studentAttendance/monthly ───────────────────────────────────────

pub async fn list_monthly(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, RegistryError> {
    list(&state, monthly(&query)?).await
}

// ── GET /api/studentAttendance/student-attendance ────────────────────────────

pub async fn get_student_history(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<StudentHistoryResponse>, RegistryError> {
    let student = query_id::<StudentId>(&query.student_id, "studentId")?;
    let usecase = StudentAttendanceHistoryUseCase {
        attendance: state.attendance_repo(),
        students: state.student_repo(),
    };
    let history = usecase.execute(student).await?;
    Ok(Json(StudentHistoryResponse {
        attendance: responses(history.records),
        student_name: history.student_name,
    }))
}

// ── GET /api/studentAttendance/students ──────────────────────────────────────

pub async fn list_class_roster(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<StudentResponse>>, RegistryError> {
    let class = query_id::<ClassId>(&query.class, "class")?;
    let usecase = ClassRosterUseCase {
        repo: state.student_repo(),
    };
    let today = Utc::now().date_naive();
    let students = usecase.execute(class).await?;
    Ok(Json(
        students
            .into_iter()
            .map(|view| StudentResponse::new(view, today))
            .collect(),
    ))
}

// ── GET /api/studentAttendance/{id} ──────────────────────────────────────────

pub async fn get_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AttendanceResponse>, RegistryError> {
    let id = path_id::<AttendanceId>(&id, RegistryError::AttendanceNotFound)?;
    let usecase = GetAttendanceUseCase {
        repo: state.attendance_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PUT /api/studentAttendance/{id} ──────────────────────────────────────────

pub async fn update_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<AttendanceForm>,
) -> Result<Json<AttendanceResponse>, RegistryError> {
    let id = path_id::<AttendanceId>(&id, RegistryError::AttendanceNotFound)?;
    let usecase = UpdateAttendanceStatusUseCase {
        repo: state.attendance_repo(),
    };
    Ok(Json(usecase.execute(id, form).await?.into()))
}

// ── DELETE /api/studentAttendance/{id} ───────────────────────────────────────

pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RegistryError> {
    let id = path_id::<AttendanceId>(&id, RegistryError::AttendanceNotFound)?;
    let usecase = DeleteAttendanceUseCase {
        repo: state.attendance_repo(),
    };
    usecase.execute(id).await?;
    Ok(deleted("Attendance"))
}
