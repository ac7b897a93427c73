use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use madrasa_domain::validate::FieldErrors;

use crate::domain::types::AttendanceView;
use crate::handlers::attendance::AttendanceResponse;

/// Largest accepted size of one uploaded file.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Registry service error variants.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{0} is required")]
    MissingParameter(&'static str),
    #[error("{}", .0.summary())]
    Invalid(FieldErrors),
    #[error("{0}")]
    InvalidBody(String),
    #[error("{0}")]
    InvalidUpload(String),
    #[error("file is too large, maximum size is 5MB")]
    FileTooLarge,
    #[error("department already exists")]
    DepartmentExists,
    #[error("subject already exists")]
    SubjectExists,
    #[error("stipend already exists")]
    StipendExists,
    #[error("this {field} is already in use")]
    DuplicateField { field: &'static str },
    #[error("attendance already exists for this student on this date")]
    AttendanceExists(Box<AttendanceView>),
    #[error("student not found")]
    StudentNotFound,
    #[error("teacher not found")]
    TeacherNotFound,
    #[error("class not found")]
    ClassNotFound,
    #[error("department not found")]
    DepartmentNotFound,
    #[error("subject not found")]
    SubjectNotFound,
    #[error("stipend not found")]
    StipendNotFound,
    #[error("attendance not found")]
    AttendanceNotFound,
    #[error("no attendance records found")]
    NoAttendanceRecords,
    #[error("no students found for this class")]
    NoStudentsInClass,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RegistryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::Invalid(_) => "VALIDATION_FAILED",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::InvalidUpload(_) => "INVALID_UPLOAD",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::DepartmentExists => "DEPARTMENT_EXISTS",
            Self::SubjectExists => "SUBJECT_EXISTS",
            Self::StipendExists => "STIPEND_EXISTS",
            Self::DuplicateField { .. } => "DUPLICATE_FIELD",
            Self::AttendanceExists(_) => "ATTENDANCE_EXISTS",
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::TeacherNotFound => "TEACHER_NOT_FOUND",
            Self::ClassNotFound => "CLASS_NOT_FOUND",
            Self::DepartmentNotFound => "DEPARTMENT_NOT_FOUND",
            Self::SubjectNotFound => "SUBJECT_NOT_FOUND",
            Self::StipendNotFound => "STIPEND_NOT_FOUND",
            Self::AttendanceNotFound => "ATTENDANCE_NOT_FOUND",
            Self::NoAttendanceRecords => "NO_ATTENDANCE_RECORDS",
            Self::NoStudentsInClass => "NO_STUDENTS_IN_CLASS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Single-field validation failure.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::Invalid(errors)
    }
}

impl From<FieldErrors> for RegistryError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::StudentNotFound
            | Self::TeacherNotFound
            | Self::ClassNotFound
            | Self::DepartmentNotFound
            | Self::SubjectNotFound
            | Self::StipendNotFound
            | Self::AttendanceNotFound
            | Self::NoAttendanceRecords
            | Self::NoStudentsInClass => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match &self {
            Self::Invalid(errors) => {
                body["errors"] = serde_json::json!(errors);
            }
            Self::DuplicateField { field } => {
                let mut errors = serde_json::Map::new();
                errors.insert((*field).to_owned(), self.to_string().into());
                body["field"] = serde_json::json!(field);
                body["errors"] = errors.into();
            }
            Self::AttendanceExists(existing) => {
                body["existing"] =
                    serde_json::json!(AttendanceResponse::from(existing.as_ref().clone()));
            }
            _ => {}
        }
        (status, axum::Json(body)).into_response()
    }
}
