//! Departments, subjects and stipends: name-keyed catalogue tables.

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use madrasa_domain::id::{DepartmentId, StipendId, SubjectId};
use madrasa_domain::name::name_key;
use madrasa_registry_schema::{departments, stipends, subjects};

use super::unique_violation;
use crate::domain::repository::{DepartmentRepository, StipendRepository, SubjectRepository};
use crate::domain::types::{Department, Stipend, Subject};
use crate::error::RegistryError;

/// Map a write failure: unique violation to `exists`, missing row to `missing`.
fn write_error(
    err: DbErr,
    exists: RegistryError,
    missing: RegistryError,
    action: &'static str,
) -> RegistryError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return missing;
    }
    if unique_violation(&err).is_some() {
        return exists;
    }
    RegistryError::Internal(anyhow::Error::new(err).context(action))
}

// ── Departments ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDepartmentRepository {
    pub db: DatabaseConnection,
}

impl DepartmentRepository for DbDepartmentRepository {
    async fn find(&self, id: DepartmentId) -> Result<Option<Department>, RegistryError> {
        let model = departments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find department by id")?;
        Ok(model.map(department_from_model))
    }

    async fn list(&self) -> Result<Vec<Department>, RegistryError> {
        let models = departments::Entity::find()
            .order_by_asc(departments::Column::Id)
            .all(&self.db)
            .await
            .context("list departments")?;
        Ok(models.into_iter().map(department_from_model).collect())
    }

    async fn name_taken(
        &self,
        key: &str,
        except: Option<DepartmentId>,
    ) -> Result<bool, RegistryError> {
        let mut query = departments::Entity::find().filter(departments::Column::NameKey.eq(key));
        if let Some(except) = except {
            query = query.filter(departments::Column::Id.ne(except.0));
        }
        let count = query
            .count(&self.db)
            .await
            .context("check department name")?;
        Ok(count > 0)
    }

    async fn create(&self, department: &Department) -> Result<(), RegistryError> {
        department_active_model(department)
            .insert(&self.db)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    RegistryError::DepartmentExists,
                    RegistryError::DepartmentNotFound,
                    "create department",
                )
            })?;
        Ok(())
    }

    async fn update(&self, department: &Department) -> Result<(), RegistryError> {
        department_active_model(department)
            .update(&self.db)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    RegistryError::DepartmentExists,
                    RegistryError::DepartmentNotFound,
                    "update department",
                )
            })?;
        Ok(())
    }

    async fn delete(&self, id: DepartmentId) -> Result<bool, RegistryError> {
        let result = departments::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete department")?;
        Ok(result.rows_affected > 0)
    }
}

fn department_active_model(d: &Department) -> departments::ActiveModel {
    departments::ActiveModel {
        id: Set(d.id.0),
        department_name: Set(d.department_name.clone()),
        name_key: Set(name_key(&d.department_name)),
        description: Set(d.description.clone()),
        created_at: Set(d.created_at),
        updated_at: Set(d.updated_at),
    }
}

fn department_from_model(model: departments::Model) -> Department {
    Department {
        id: DepartmentId(model.id),
        department_name: model.department_name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Subjects ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubjectRepository {
    pub db: DatabaseConnection,
}

impl SubjectRepository for DbSubjectRepository {
    async fn find(&self, id: SubjectId) -> Result<Option<Subject>, RegistryError> {
        let model = subjects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find subject by id")?;
        Ok(model.map(subject_from_model))
    }

    async fn list(&self) -> Result<Vec<Subject>, RegistryError> {
        let models = subjects::Entity::find()
            .order_by_asc(subjects::Column::Id)
            .all(&self.db)
            .await
            .context("list subjects")?;
        Ok(models.into_iter().map(subject_from_model).collect())
    }

    async fn name_taken(&self, key: &str, except: Option<SubjectId>) -> Result<bool, RegistryError> {
        let mut query = subjects::Entity::find().filter(subjects::Column::NameKey.eq(key));
        if let Some(except) = except {
            query = query.filter(subjects::Column::Id.ne(except.0));
        }
        let count = query.count(&self.db).await.context("check subject name")?;
        Ok(count > 0)
    }

    async fn create(&self, subject: &Subject) -> Result<(), RegistryError> {
        subject_active_model(subject)
            .insert(&self.db)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    RegistryError::SubjectExists,
                    RegistryError::SubjectNotFound,
                    "create subject",
                )
            })?;
        Ok(())
    }

    async fn update(&self, subject: &Subject) -> Result<(), RegistryError> {
        subject_active_model(subject)
            .update(&self.db)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    RegistryError::SubjectExists,
                    RegistryError::SubjectNotFound,
                    "update subject",
                )
            })?;
        Ok(())
    }

    async fn delete(&self, id: SubjectId) -> Result<bool, RegistryError> {
        let result = subjects::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete subject")?;
        Ok(result.rows_affected > 0)
    }
}

fn subject_active_model(s: &Subject) -> subjects::ActiveModel {
    subjects::ActiveModel {
        id: Set(s.id.0),
        subject_name: Set(s.subject_name.clone()),
        name_key: Set(name_key(&s.subject_name)),
        description: Set(s.description.clone()),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

fn subject_from_model(model: subjects::Model) -> Subject {
    Subject {
        id: SubjectId(model.id),
        subject_name: model.subject_name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Stipends ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStipendRepository {
    pub db: DatabaseConnection,
}

impl StipendRepository for DbStipendRepository {
    async fn find(&self, id: StipendId) -> Result<Option<Stipend>, RegistryError> {
        let model = stipends::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find stipend by id")?;
        Ok(model.map(stipend_from_model))
    }

    async fn list(&self) -> Result<Vec<Stipend>, RegistryError> {
        let models = stipends::Entity::find()
            .order_by_asc(stipends::Column::StipendName)
            .order_by_asc(stipends::Column::Id)
            .all(&self.db)
            .await
            .context("list stipends")?;
        Ok(models.into_iter().map(stipend_from_model).collect())
    }

    async fn name_taken(&self, key: &str, except: Option<StipendId>) -> Result<bool, RegistryError> {
        let mut query = stipends::Entity::find().filter(stipends::Column::NameKey.eq(key));
        if let Some(except) = except {
            query = query.filter(stipends::Column::Id.ne(except.0));
        }
        let count = query.count(&self.db).await.context("check stipend name")?;
        Ok(count > 0)
    }

    async fn create(&self, stipend: &Stipend) -> Result<(), RegistryError> {
        stipend_active_model(stipend)
            .insert(&self.db)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    RegistryError::StipendExists,
                    RegistryError::StipendNotFound,
                    "create stipend",
                )
            })?;
        Ok(())
    }

    async fn update(&self, stipend: &Stipend) -> Result<(), RegistryError> {
        stipend_active_model(stipend)
            .update(&self.db)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    RegistryError::StipendExists,
                    RegistryError::StipendNotFound,
                    "update stipend",
                )
            })?;
        Ok(())
    }

    async fn delete(&self, id: StipendId) -> Result<bool, RegistryError> {
        let result = stipends::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete stipend")?;
        Ok(result.rows_affected > 0)
    }
}

fn stipend_active_model(s: &Stipend) -> stipends::ActiveModel {
    stipends::ActiveModel {
        id: Set(s.id.0),
        stipend_name: Set(s.stipend_name.clone()),
        name_key: Set(name_key(&s.stipend_name)),
        amount: Set(s.amount),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

fn stipend_from_model(model: stipends::Model) -> Stipend {
    Stipend {
        id: StipendId(model.id),
        stipend_name: model.stipend_name,
        amount: model.amount,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::infra::db::migrated_db;

    fn department(name: &str) -> Department {
        Department {
            id: DepartmentId::generate(),
            department_name: name.into(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn should_map_normalized_name_collision_to_department_exists() {
        let db = migrated_db().await;
        let repo = DbDepartmentRepository { db: db.conn.clone() };
        repo.create(&department("Hifz")).await.unwrap();

        let result = repo.create(&department("  hifz ")).await;

        assert!(
            matches!(result, Err(RegistryError::DepartmentExists)),
            "expected DepartmentExists, got {result:?}"
        );
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
