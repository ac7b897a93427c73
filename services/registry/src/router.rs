use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

use madrasa_core::health::{healthz, readyz};
use madrasa_core::middleware::{
    cors_layer, propagate_request_id_layer, request_id_layer, trace_layer,
};

use crate::error::MAX_UPLOAD_BYTES;
use crate::handlers::{
    attendance::{
        create_attendance, delete_attendance, get_attendance, get_by_student_class_date,
        get_student_history, list_by_class_date, list_by_date_range, list_by_student_class,
        list_class_roster, list_monthly, update_attendance,
    },
    class::{create_class, delete_class, get_class, list_classes, update_class},
    department::{
        create_department, delete_department, get_department, list_departments,
        update_department,
    },
    stipend::{create_stipend, delete_stipend, get_stipend, list_stipends, update_stipend},
    student::{
        check_student_unique, create_student, delete_student, get_student, list_students,
        update_student,
    },
    subject::{create_subject, delete_subject, get_subject, list_subjects, update_subject},
    teacher::{
        check_teacher_unique, create_teacher, delete_teacher, get_teacher, list_teachers,
        update_teacher,
    },
    user::{create_user, list_users},
};
use crate::state::AppState;

/// Room for three maximum-size files plus the text fields.
const STUDENT_BODY_LIMIT: usize = 3 * MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState, cors_origin: Option<&str>) -> Router {
    let uploads = ServeDir::new(state.files.root());

    let students = Router::new()
        .route("/api/students", get(list_students).post(create_student))
        .route(
            "/api/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .layer(DefaultBodyLimit::max(STUDENT_BODY_LIMIT));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Students
        .merge(students)
        .route("/api/students/check-unique", post(check_student_unique))
        // Teachers
        .route("/api/teachers", get(list_teachers).post(create_teacher))
        .route("/api/teachers/check-unique", post(check_teacher_unique))
        .route(
            "/api/teachers/{id}",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        // Classes
        .route("/api/classes", get(list_classes).post(create_class))
        .route(
            "/api/classes/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        // Departments
        .route("/api/departments", get(list_departments).post(create_department))
        .route(
            "/api/departments/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
        // Subjects
        .route("/api/subjects", get(list_subjects).post(create_subject))
        .route(
            "/api/subjects/{id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        // Stipends
        .route("/api/stipends", get(list_stipends).post(create_stipend))
        .route(
            "/api/stipends/{id}",
            get(get_stipend).put(update_stipend).delete(delete_stipend),
        )
        // Attendance
        .route("/api/studentAttendance", post(create_attendance))
        .route(
            "/api/studentAttendance/by-student-class-date",
            get(get_by_student_class_date),
        )
        .route("/api/studentAttendance/by-class-date", get(list_by_class_date))
        .route(
            "/api/studentAttendance/by-student-class",
            get(list_by_student_class),
        )
        .route("/api/studentAttendance/by-date-range", get(list_by_date_range))
        .route("/api/studentAttendance/monthly", get(list_monthly))
        .route(
            "/api/studentAttendance/student-attendance",
            get(get_student_history),
        )
        .route("/api/studentAttendance/students", get(list_class_roster))
        .route(
            "/api/studentAttendance/{id}",
            get(get_attendance)
                .put(update_attendance)
                .delete(delete_attendance),
        )
        // Users
        .route("/api/users", get(list_users).post(create_user))
        // Uploaded files
        .nest_service("/api/uploads", uploads)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer())
                .layer(cors_layer(cors_origin)),
        )
}
