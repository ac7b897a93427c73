pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_departments;
mod m20260301_000002_create_subjects;
mod m20260301_000003_create_stipends;
mod m20260301_000004_create_teachers;
mod m20260301_000005_create_classes;
mod m20260301_000006_create_students;
mod m20260301_000007_create_attendances;
mod m20260301_000008_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_departments::Migration),
            Box::new(m20260301_000002_create_subjects::Migration),
            Box::new(m20260301_000003_create_stipends::Migration),
            Box::new(m20260301_000004_create_teachers::Migration),
            Box::new(m20260301_000005_create_classes::Migration),
            Box::new(m20260301_000006_create_students::Migration),
            Box::new(m20260301_000007_create_attendances::Migration),
            Box::new(m20260301_000008_create_users::Migration),
        ]
    }
}
