use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use axum_test::TestServer;
use serde_json::{Value, json};

use madrasa_registry::infra::storage::DiskFileStore;
use madrasa_registry::router::build_router;
use madrasa_registry::state::AppState;
use madrasa_registry_migration::{Migrator, MigratorTrait};
use madrasa_testing::db::ScratchDb;
use madrasa_testing::fixture::Fixture;
use madrasa_testing::scratch::ScratchDir;

// ── TestApp ──────────────────────────────────────────────────────────────────

/// Router over a migrated scratch database and a scratch upload directory.
pub struct TestApp {
    pub server: TestServer,
    _db: ScratchDb,
    uploads: ScratchDir,
    seq: AtomicU32,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db = ScratchDb::connect().await;
        Migrator::up(&db.conn, None).await.unwrap();

        let uploads = ScratchDir::new("uploads");
        let files = DiskFileStore::new(uploads.path());
        files.ensure_dirs().await.unwrap();

        let state = AppState {
            db: db.conn.clone(),
            files,
        };
        let server = TestServer::new(build_router(state, None)).unwrap();
        Self {
            server,
            _db: db,
            uploads,
            seq: AtomicU32::new(1),
        }
    }

    pub fn photo_path(&self, filename: &str) -> PathBuf {
        self.uploads.path().join("students/photos").join(filename)
    }

    /// POST `body` and return the created record, asserting 201.
    pub async fn create(&self, path: &str, body: &Value) -> Value {
        let response = self.server.post(path).json(body).await;
        assert_eq!(
            response.status_code(),
            201,
            "POST {path} failed: {}",
            response.text()
        );
        response.json()
    }

    pub async fn department(&self, name: &str) -> String {
        let created = self
            .create("/api/departments", &json!({ "departmentName": name }))
            .await;
        id_of(&created)
    }

    pub async fn subject(&self, name: &str) -> String {
        let created = self
            .create("/api/subjects", &json!({ "subjectName": name }))
            .await;
        id_of(&created)
    }

    /// The `maulana_yusuf` fixture with fresh unique fields and its own subject.
    pub async fn teacher(&self) -> String {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let subject = self.subject(&format!("Subject {n}")).await;
        let mut body = Fixture::load("fixtures/teachers/maulana_yusuf.json");
        body["subject"] = subject.into();
        body["teacherId"] = format!("T-{n:03}").into();
        body["email"] = format!("teacher{n}@example.com").into();
        body["identityCardNo"] = format!("35202-{n:07}-1").into();
        let created = self.create("/api/teachers", &body).await;
        id_of(&created)
    }

    /// A class with its own teacher and department. Returns `(class, department)`.
    pub async fn class(&self, name: &str) -> (String, String) {
        let teacher = self.teacher().await;
        let department = self.department(&format!("{name} Department")).await;
        let created = self
            .create(
                "/api/classes",
                &json!({
                    "className": name,
                    "teacher": teacher,
                    "department": department,
                    "shift": ["Morning"],
                }),
            )
            .await;
        (id_of(&created), department)
    }

    pub async fn student(&self, body: &Value) -> Value {
        self.create("/api/students", body).await
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// The `ali_khan` student fixture enrolled in `class`.
pub fn student_body(class: &str, department: &str) -> Value {
    let mut body = Fixture::load("fixtures/students/ali_khan.json");
    body["class"] = class.into();
    body["department"] = department.into();
    body
}

pub fn id_of(record: &Value) -> String {
    record["id"]
        .as_str()
        .unwrap_or_else(|| panic!("record has no id: {record}"))
        .to_owned()
}
