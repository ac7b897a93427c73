use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};

use crate::helpers::{TestApp, id_of, student_body};

fn multipart_from(body: &Value) -> MultipartForm {
    let mut form = MultipartForm::new();
    for (key, value) in body.as_object().unwrap() {
        form = form.add_text(key.clone(), value.as_str().unwrap().to_owned());
    }
    form
}

// ── Create / uniqueness ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_student_from_json_with_populated_refs() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;

    let student = app.student(&student_body(&class, &department)).await;

    assert_eq!(student["name"], "Ali Khan");
    assert_eq!(student["status"], "Active");
    assert_eq!(student["class"]["id"], class.as_str());
    assert_eq!(student["class"]["className"], "Hifz A");
    assert_eq!(student["department"]["id"], department.as_str());
    assert_eq!(student["dateOfBirth"], "2010-06-15T00:00:00.000Z");
    assert!(student["photo"].is_null());
}

#[tokio::test]
async fn should_reject_duplicate_role_number_and_keep_first_student() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;
    let first = app.student(&student_body(&class, &department)).await;

    let mut second = student_body(&class, &department);
    second["name"] = "Bilal Ahmed".into();
    second["registrationNumber"] = "REG-2024-999".into();
    let response = app.server.post("/api/students").json(&second).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["kind"], "DUPLICATE_FIELD");
    assert_eq!(body["field"], "roleNumber");

    let listed: Value = app.server.get("/api/students").await.json();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], first["id"]);
    assert_eq!(listed[0]["name"], "Ali Khan");
}

#[tokio::test]
async fn should_reject_update_to_another_students_numbers() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;
    let first = app.student(&student_body(&class, &department)).await;
    let mut other = student_body(&class, &department);
    other["name"] = "Bilal Ahmed".into();
    other["roleNumber"] = "R-OTHER".into();
    other["registrationNumber"] = "REG-OTHER".into();
    let second = app.student(&other).await;
    let path = format!("/api/students/{}", id_of(&second));

    for (field, value) in [
        ("roleNumber", "R-101"),
        ("registrationNumber", "REG-2024-101"),
    ] {
        let response = app.server.put(&path).json(&json!({ field: value })).await;
        assert_eq!(response.status_code(), 400, "{field}: {}", response.text());
        let body: Value = response.json();
        assert_eq!(body["kind"], "DUPLICATE_FIELD");
        assert_eq!(body["field"], field);
    }

    let unchanged: Value = app.server.get(&path).await.json();
    assert_eq!(unchanged["roleNumber"], "R-OTHER");
    assert_eq!(unchanged["registrationNumber"], "REG-OTHER");
    let original: Value = app
        .server
        .get(&format!("/api/students/{}", id_of(&first)))
        .await
        .json();
    assert_eq!(original["roleNumber"], "R-101");
    assert_eq!(original["registrationNumber"], "REG-2024-101");
}

#[tokio::test]
async fn should_report_every_invalid_field_at_once() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;
    let mut body = student_body(&class, &department);
    body["fatherIdentityCard"] = "123".into();
    body["guardianPhone"] = "call me".into();
    body["gender"] = "".into();

    let response = app.server.post("/api/students").json(&body).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_FAILED");
    for field in ["fatherIdentityCard", "guardianPhone", "gender"] {
        assert!(body["errors"][field].is_string(), "missing error for {field}: {body}");
    }
}

#[tokio::test]
async fn should_check_uniqueness_of_registration_number() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;
    app.student(&student_body(&class, &department)).await;

    let taken: Value = app
        .server
        .post("/api/students/check-unique")
        .json(&json!({ "field": "registrationNumber", "value": "REG-2024-101" }))
        .await
        .json();
    let free: Value = app
        .server
        .post("/api/students/check-unique")
        .json(&json!({ "field": "registrationNumber", "value": "REG-2024-102" }))
        .await
        .json();
    let other: Value = app
        .server
        .post("/api/students/check-unique")
        .json(&json!({ "field": "name", "value": "Ali Khan" }))
        .await
        .json();

    assert_eq!(taken["isUnique"], false);
    assert_eq!(free["isUnique"], true);
    assert_eq!(other["isUnique"], true);
}

#[tokio::test]
async fn should_filter_students_by_class() {
    let app = TestApp::spawn().await;
    let (hifz, department) = app.class("Hifz A").await;
    let (nazra, _) = app.class("Nazra B").await;
    app.student(&student_body(&hifz, &department)).await;

    let in_hifz: Value = app
        .server
        .get("/api/students")
        .add_query_param("class", &hifz)
        .await
        .json();
    let in_nazra: Value = app
        .server
        .get("/api/students")
        .add_query_param("class", &nazra)
        .await
        .json();

    assert_eq!(in_hifz.as_array().unwrap().len(), 1);
    assert!(in_nazra.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_return_not_found_for_malformed_student_id() {
    let app = TestApp::spawn().await;
    let response = app.server.get("/api/students/not-an-id").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["kind"], "STUDENT_NOT_FOUND");
}

// ── Status transitions ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_expelled_date_before_expelling() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;
    let student = app.student(&student_body(&class, &department)).await;
    let path = format!("/api/students/{}", id_of(&student));

    let rejected = app
        .server
        .put(&path)
        .json(&json!({ "status": "Expelled" }))
        .await;
    assert_eq!(rejected.status_code(), 400);
    let body: Value = rejected.json();
    assert!(body["errors"]["expelledDate"].is_string(), "got {body}");

    let unchanged: Value = app.server.get(&path).await.json();
    assert_eq!(unchanged["status"], "Active");

    let accepted = app
        .server
        .put(&path)
        .json(&json!({ "status": "Expelled", "expelledDate": "2024-03-01" }))
        .await;
    assert_eq!(accepted.status_code(), 200);
    let updated: Value = accepted.json();
    assert_eq!(updated["status"], "Expelled");
    assert_eq!(updated["expelledDate"], "2024-03-01T00:00:00.000Z");
    assert_eq!(updated["name"], "Ali Khan");
}

// ── Files ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_photo_and_remove_it_with_the_student() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;
    let form = multipart_from(&student_body(&class, &department)).add_part(
        "photo",
        Part::bytes(b"\xFF\xD8\xFFjpeg".to_vec())
            .file_name("portrait.JPG")
            .mime_type("image/jpeg"),
    );

    let response = app.server.post("/api/students").multipart(form).await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let student: Value = response.json();
    let photo = student["photo"].as_str().unwrap().to_owned();
    assert!(photo.starts_with("Ali_Khan_photo_"), "unexpected name {photo}");
    assert!(photo.ends_with(".jpg"));
    assert!(app.photo_path(&photo).exists());

    let served = app
        .server
        .get(&format!("/api/uploads/students/photos/{photo}"))
        .await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(&served.as_bytes()[..], b"\xFF\xD8\xFFjpeg");

    let deleted = app
        .server
        .delete(&format!("/api/students/{}", id_of(&student)))
        .await;
    assert_eq!(deleted.status_code(), 200);
    let body: Value = deleted.json();
    assert_eq!(body["message"], "Student deleted successfully");

    let refetch = app
        .server
        .get(&format!("/api/students/{}", id_of(&student)))
        .await;
    assert_eq!(refetch.status_code(), 404);

    assert!(!app.photo_path(&photo).exists());
    let gone = app
        .server
        .get(&format!("/api/uploads/students/photos/{photo}"))
        .await;
    assert_eq!(gone.status_code(), 404);
}

#[tokio::test]
async fn should_reject_non_image_photo_without_creating_student() {
    let app = TestApp::spawn().await;
    let (class, department) = app.class("Hifz A").await;
    let form = multipart_from(&student_body(&class, &department)).add_part(
        "photo",
        Part::bytes(b"%PDF-1.4".to_vec())
            .file_name("scan.pdf")
            .mime_type("application/pdf"),
    );

    let response = app.server.post("/api/students").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_UPLOAD");
    let listed: Value = app.server.get("/api/students").await.json();
    assert!(listed.as_array().unwrap().is_empty());
}
