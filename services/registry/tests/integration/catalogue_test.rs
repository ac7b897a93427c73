use serde_json::{Value, json};

use madrasa_testing::fixture::Fixture;

use crate::helpers::{TestApp, id_of};

// ── Departments ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_normalize_department_name_and_reject_spelling_variants() {
    let app = TestApp::spawn().await;
    let created = app
        .create(
            "/api/departments",
            &Fixture::load("fixtures/departments/computer_science.json"),
        )
        .await;
    assert_eq!(created["departmentName"], "Computer Science");

    for variant in ["computer science", "COMPUTER   SCIENCE", " Computer Science "] {
        let response = app
            .server
            .post("/api/departments")
            .json(&json!({ "departmentName": variant }))
            .await;
        assert_eq!(response.status_code(), 400, "variant {variant:?} was accepted");
        let body: Value = response.json();
        assert_eq!(body["kind"], "DEPARTMENT_EXISTS");
    }

    let listed: Value = app.server.get("/api/departments").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_rename_department_and_clear_description() {
    let app = TestApp::spawn().await;
    let created = app
        .create(
            "/api/departments",
            &Fixture::load("fixtures/departments/computer_science.json"),
        )
        .await;
    let path = format!("/api/departments/{}", id_of(&created));

    let response = app
        .server
        .put(&path)
        .json(&json!({ "departmentName": "computer  science", "description": "" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["departmentName"], "computer science");
    assert!(updated["description"].is_null());
}

#[tokio::test]
async fn should_delete_department_then_report_not_found() {
    let app = TestApp::spawn().await;
    let id = app.department("Hifz").await;
    let path = format!("/api/departments/{id}");

    let deleted = app.server.delete(&path).await;
    assert_eq!(deleted.status_code(), 200);
    let body: Value = deleted.json();
    assert_eq!(body["message"], "Department deleted successfully");

    let again = app.server.delete(&path).await;
    assert_eq!(again.status_code(), 404);
    let body: Value = again.json();
    assert_eq!(body["kind"], "DEPARTMENT_NOT_FOUND");
}

// ── Subjects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_case_insensitive_duplicate_subject() {
    let app = TestApp::spawn().await;
    app.subject("Tajweed").await;

    let response = app
        .server
        .post("/api/subjects")
        .json(&json!({ "subjectName": "TAJWEED" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["kind"], "SUBJECT_EXISTS");
}

// ── Stipends ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_round_trip_stipend_amount_as_integer() {
    let app = TestApp::spawn().await;
    let created = app
        .create("/api/stipends", &Fixture::load("fixtures/stipends/merit_award.json"))
        .await;
    assert_eq!(created["stipendName"], "Merit Award");
    assert_eq!(created["amount"], 5000);

    let fetched: Value = app
        .server
        .get(&format!("/api/stipends/{}", id_of(&created)))
        .await
        .json();
    assert_eq!(fetched["stipendName"], "Merit Award");
    assert_eq!(fetched["amount"], json!(5000));

    let duplicate = app
        .server
        .post("/api/stipends")
        .json(&json!({ "stipendName": "merit award", "amount": 100 }))
        .await;
    assert_eq!(duplicate.status_code(), 400);
    let body: Value = duplicate.json();
    assert_eq!(body["kind"], "STIPEND_EXISTS");
}

#[tokio::test]
async fn should_reject_negative_stipend_amount() {
    let app = TestApp::spawn().await;
    let response = app
        .server
        .post("/api/stipends")
        .json(&json!({ "stipendName": "Hardship", "amount": -1 }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["errors"]["amount"].is_string(), "got {body}");
}

// ── Teachers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_populate_subject_and_filter_teachers_by_it() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher().await;
    let other_subject = app.subject("Fiqh").await;

    let fetched: Value = app
        .server
        .get(&format!("/api/teachers/{teacher}"))
        .await
        .json();
    assert_eq!(fetched["email"], "teacher1@example.com");
    assert_eq!(fetched["salary"], 45000);
    let subject = id_of(&fetched["subject"]);

    let matching: Value = app
        .server
        .get("/api/teachers")
        .add_query_param("subject", &subject)
        .await
        .json();
    let none: Value = app
        .server
        .get("/api/teachers")
        .add_query_param("subject", &other_subject)
        .await
        .json();
    assert_eq!(matching.as_array().unwrap().len(), 1);
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_check_teacher_email_case_insensitively() {
    let app = TestApp::spawn().await;
    app.teacher().await;

    let taken: Value = app
        .server
        .post("/api/teachers/check-unique")
        .json(&json!({ "field": "email", "value": "Teacher1@Example.com" }))
        .await
        .json();

    assert_eq!(taken["isUnique"], false);
}

#[tokio::test]
async fn should_reject_bad_subject_filter() {
    let app = TestApp::spawn().await;
    let response = app
        .server
        .get("/api/teachers")
        .add_query_param("subject", "nope")
        .await;
    assert_eq!(response.status_code(), 400);
}

// ── Classes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_class_with_populated_teacher_and_shifts() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;

    let fetched: Value = app
        .server
        .get(&format!("/api/classes/{class}"))
        .await
        .json();
    assert_eq!(fetched["className"], "Hifz A");
    assert_eq!(fetched["shift"], json!(["Morning"]));
    assert_eq!(fetched["department"]["id"], department.as_str());
    assert!(fetched["teacher"]["id"].is_string());

    let by_department: Value = app
        .server
        .get("/api/classes")
        .add_query_param("department", &department)
        .await
        .json();
    assert_eq!(by_department.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_unknown_shift() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher().await;
    let department = app.department("Nazra").await;

    let response = app
        .server
        .post("/api/classes")
        .json(&json!({
            "className": "Nazra B",
            "teacher": teacher,
            "department": department,
            "shift": ["Midnight"],
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["errors"]["shift"].is_string(), "got {body}");
}

// ── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_user_without_exposing_password() {
    let app = TestApp::spawn().await;
    let created = app
        .create(
            "/api/users",
            &json!({ "name": "Admin", "email": " Admin@Madrasa.org ", "password": "s3cret pass" }),
        )
        .await;
    assert_eq!(created["email"], "admin@madrasa.org");
    assert!(created.get("password").is_none());
    assert!(created.get("passwordHash").is_none());

    let duplicate = app
        .server
        .post("/api/users")
        .json(&json!({ "name": "Other", "email": "ADMIN@madrasa.org", "password": "x" }))
        .await;
    assert_eq!(duplicate.status_code(), 400);
    let body: Value = duplicate.json();
    assert_eq!(body["field"], "email");

    let listed: Value = app.server.get("/api/users").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
