//! Batch lookups that resolve reference columns to display fields.

use std::collections::{BTreeSet, HashMap};

use anyhow::Context as _;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use madrasa_domain::id::{ClassId, DepartmentId, StudentId, SubjectId, TeacherId};
use madrasa_registry_schema::{classes, departments, students, subjects, teachers};

use crate::domain::types::{ClassRef, DepartmentRef, StudentRef, SubjectRef, TeacherRef};
use crate::error::RegistryError;

fn distinct(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

pub(super) async fn class_refs(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, ClassRef>, RegistryError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = classes::Entity::find()
        .filter(classes::Column::Id.is_in(ids))
        .all(db)
        .await
        .context("load class references")?;
    Ok(rows
        .into_iter()
        .map(|m| {
            let r = ClassRef {
                id: ClassId(m.id),
                class_name: m.class_name,
            };
            (m.id, r)
        })
        .collect())
}

pub(super) async fn department_refs(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, DepartmentRef>, RegistryError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = departments::Entity::find()
        .filter(departments::Column::Id.is_in(ids))
        .all(db)
        .await
        .context("load department references")?;
    Ok(rows
        .into_iter()
        .map(|m| {
            let r = DepartmentRef {
                id: DepartmentId(m.id),
                department_name: m.department_name,
            };
            (m.id, r)
        })
        .collect())
}

pub(super) async fn subject_refs(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, SubjectRef>, RegistryError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = subjects::Entity::find()
        .filter(subjects::Column::Id.is_in(ids))
        .all(db)
        .await
        .context("load subject references")?;
    Ok(rows
        .into_iter()
        .map(|m| {
            let r = SubjectRef {
                id: SubjectId(m.id),
                subject_name: m.subject_name,
            };
            (m.id, r)
        })
        .collect())
}

pub(super) async fn teacher_refs(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, TeacherRef>, RegistryError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = teachers::Entity::find()
        .filter(teachers::Column::Id.is_in(ids))
        .all(db)
        .await
        .context("load teacher references")?;
    Ok(rows
        .into_iter()
        .map(|m| {
            let r = TeacherRef {
                id: TeacherId(m.id),
                name: m.name,
            };
            (m.id, r)
        })
        .collect())
}

pub(super) async fn student_refs(
    db: &DatabaseConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, StudentRef>, RegistryError> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = students::Entity::find()
        .filter(students::Column::Id.is_in(ids))
        .all(db)
        .await
        .context("load student references")?;
    Ok(rows
        .into_iter()
        .map(|m| {
            let r = StudentRef {
                id: StudentId(m.id),
                name: m.name,
            };
            (m.id, r)
        })
        .collect())
}
