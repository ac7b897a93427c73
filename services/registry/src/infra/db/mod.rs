//! sea-orm implementations of the repository ports.

use sea_orm::{DbErr, SqlErr};

mod attendance;
mod catalogue;
mod class;
mod refs;
mod student;
mod teacher;
mod user;

pub use attendance::DbAttendanceRepository;
pub use catalogue::{DbDepartmentRepository, DbStipendRepository, DbSubjectRepository};
pub use class::DbClassRepository;
pub use student::DbStudentRepository;
pub use teacher::DbTeacherRepository;
pub use user::DbUserRepository;

/// Driver message of a unique-constraint violation, if `err` is one.
///
/// Postgres names the violated index, SQLite names `table.column`; both
/// contain the column name.
fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

/// A scratch SQLite database with every migration applied.
#[cfg(test)]
async fn migrated_db() -> madrasa_testing::db::ScratchDb {
    use madrasa_registry_migration::{Migrator, MigratorTrait};

    let db = madrasa_testing::db::ScratchDb::connect().await;
    Migrator::up(&db.conn, None).await.unwrap();
    db
}
