use serde_json::{Value, json};

use crate::helpers::{TestApp, id_of, student_body};

/// One class with one enrolled student. Returns `(student, class)`.
async fn enrolled(app: &TestApp) -> (String, String) {
    let (class, department) = app.class("Hifz A").await;
    let student = app.student(&student_body(&class, &department)).await;
    (id_of(&student), class)
}

async fn mark(app: &TestApp, student: &str, class: &str, date: &str, status: &str) -> Value {
    app.create(
        "/api/studentAttendance",
        &json!({ "student": student, "class": class, "date": date, "status": status }),
    )
    .await
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_attendance_with_populated_refs() {
    let app = TestApp::spawn().await;
    let (student, class) = enrolled(&app).await;

    let record = mark(&app, &student, &class, "2024-01-15", "Present").await;

    assert_eq!(record["student"]["id"], student.as_str());
    assert_eq!(record["student"]["name"], "Ali Khan");
    assert_eq!(record["class"]["className"], "Hifz A");
    assert_eq!(record["date"], "2024-01-15T00:00:00.000Z");
    assert_eq!(record["status"], "Present");
}

#[tokio::test]
async fn should_return_existing_record_for_second_mark_on_same_day() {
    let app = TestApp::spawn().await;
    let (student, class) = enrolled(&app).await;
    let first = mark(&app, &student, &class, "2024-01-15", "Present").await;

    let response = app
        .server
        .post("/api/studentAttendance")
        .json(&json!({
            "student": student,
            "class": class,
            "date": "2024-01-15T09:30:00.000Z",
            "status": "Absent",
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["kind"], "ATTENDANCE_EXISTS");
    assert_eq!(body["existing"]["id"], first["id"]);
    assert_eq!(body["existing"]["status"], "Present");
    assert_eq!(body["existing"]["student"], first["student"]);
    assert_eq!(body["existing"]["class"]["className"], "Hifz A");

    let listed: Value = app
        .server
        .get("/api/studentAttendance/by-class-date")
        .add_query_param("classId", &class)
        .add_query_param("date", "2024-01-15")
        .await
        .json();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "Present");
}

#[tokio::test]
async fn should_name_first_missing_field() {
    let app = TestApp::spawn().await;
    let response = app
        .server
        .post("/api/studentAttendance")
        .json(&json!({ "status": "Present" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_PARAMETER");
    assert_eq!(body["message"], "student is required");
}

// ── Queries ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_january_range_inclusive_and_ascending() {
    let app = TestApp::spawn().await;
    let (student, class) = enrolled(&app).await;
    for date in ["2024-01-31", "2024-02-01", "2024-01-01", "2024-01-15"] {
        mark(&app, &student, &class, date, "Present").await;
    }

    let response = app
        .server
        .get("/api/studentAttendance/by-date-range")
        .add_query_param("classId", &class)
        .add_query_param("startDate", "2024-01-01")
        .add_query_param("endDate", "2024-01-31")
        .await;

    assert_eq!(response.status_code(), 200);
    let records: Value = response.json();
    let dates: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        [
            "2024-01-01T00:00:00.000Z",
            "2024-01-15T00:00:00.000Z",
            "2024-01-31T00:00:00.000Z",
        ]
    );
}

#[tokio::test]
async fn should_require_class_for_date_range() {
    let app = TestApp::spawn().await;
    let response = app
        .server
        .get("/api/studentAttendance/by-date-range")
        .add_query_param("startDate", "2024-01-01")
        .add_query_param("endDate", "2024-01-31")
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_PARAMETER");
}

#[tokio::test]
async fn should_find_single_mark_by_student_class_and_date() {
    let app = TestApp::spawn().await;
    let (student, class) = enrolled(&app).await;
    mark(&app, &student, &class, "2024-03-04", "Leave").await;

    let found = app
        .server
        .get("/api/studentAttendance/by-student-class-date")
        .add_query_param("studentId", &student)
        .add_query_param("classId", &class)
        .add_query_param("date", "2024-03-04")
        .await;
    assert_eq!(found.status_code(), 200);
    let body: Value = found.json();
    assert_eq!(body["status"], "Leave");

    let missing = app
        .server
        .get("/api/studentAttendance/by-student-class-date")
        .add_query_param("studentId", &student)
        .add_query_param("classId", &class)
        .add_query_param("date", "2024-03-05")
        .await;
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn should_report_history_newest_first_with_student_name() {
    let app = TestApp::spawn().await;
    let (student, class) = enrolled(&app).await;
    mark(&app, &student, &class, "2024-01-02", "Present").await;
    mark(&app, &student, &class, "2024-01-03", "Absent").await;

    let history: Value = app
        .server
        .get("/api/studentAttendance/student-attendance")
        .add_query_param("studentId", &student)
        .await
        .json();

    assert_eq!(history["studentName"], "Ali Khan");
    let records = history["attendance"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["status"], "Absent");
    assert_eq!(records[1]["status"], "Present");
}

#[tokio::test]
async fn should_filter_one_month_for_student() {
    let app = TestApp::spawn().await;
    let (student, class) = enrolled(&app).await;
    for date in ["2024-02-01", "2024-02-29", "2024-03-01"] {
        mark(&app, &student, &class, date, "Present").await;
    }

    let records: Value = app
        .server
        .get("/api/studentAttendance/monthly")
        .add_query_param("studentId", &student)
        .add_query_param("month", "2")
        .add_query_param("year", "2024")
        .await
        .json();

    assert_eq!(records.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn should_list_class_roster_or_report_empty_class() {
    let app = TestApp::spawn().await;
    let (_, class) = enrolled(&app).await;
    let (empty, _) = app.class("Nazra B").await;

    let roster: Value = app
        .server
        .get("/api/studentAttendance/students")
        .add_query_param("class", &class)
        .await
        .json();
    assert_eq!(roster.as_array().unwrap().len(), 1);
    assert_eq!(roster[0]["name"], "Ali Khan");

    let response = app
        .server
        .get("/api/studentAttendance/students")
        .add_query_param("class", &empty)
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["kind"], "NO_STUDENTS_IN_CLASS");
}

// ── Update / delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_only_status() {
    let app = TestApp::spawn().await;
    let (student, class) = enrolled(&app).await;
    let record = mark(&app, &student, &class, "2024-01-15", "Present").await;
    let path = format!("/api/studentAttendance/{}", id_of(&record));

    let response = app
        .server
        .put(&path)
        .json(&json!({ "status": "Unhealthy", "date": "2030-01-01" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["status"], "Unhealthy");
    assert_eq!(updated["date"], "2024-01-15T00:00:00.000Z");

    let deleted = app.server.delete(&path).await;
    assert_eq!(deleted.status_code(), 200);
    let gone = app.server.get(&path).await;
    assert_eq!(gone.status_code(), 404);
}
